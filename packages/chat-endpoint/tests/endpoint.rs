use ai_widget_core::{
    ChatClient, ChatRequest, Error, MemoryStore, NullRenderer, Role, SendOutcome, Widget,
    WidgetConfig,
};
use ai_widget_endpoint::{serve, EchoResponder, Responder};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn reply(&self, _message: &str, _context_ref: &str) -> anyhow::Result<String> {
        anyhow::bail!("backend unavailable")
    }
}

/// Responder that reports the context reference it was given.
struct ContextResponder;

#[async_trait]
impl Responder for ContextResponder {
    async fn reply(&self, message: &str, context_ref: &str) -> anyhow::Result<String> {
        Ok(format!("{message} @ {context_ref}"))
    }
}

struct TestServer {
    addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start(responder: Arc<dyn Responder>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            serve(listener, responder, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });
        Self {
            addr,
            _shutdown: tx,
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

#[tokio::test]
async fn test_chat_returns_bot_reply() {
    let server = TestServer::start(Arc::new(EchoResponder)).await;
    let client = ChatClient::new(&server.url());

    let reply = client
        .send_chat(&ChatRequest::new("Hello", "http://shop.local/api/swagger.json"))
        .await
        .unwrap();

    assert_eq!(reply.message, "AI Bot: Отримано запит: \"Hello\"");
    assert_eq!(reply.kind.as_deref(), Some("bot"));
    assert!(reply.id.unwrap() > 0);
    assert!(reply.timestamp.unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_context_ref_reaches_responder() {
    let server = TestServer::start(Arc::new(ContextResponder)).await;
    let client = ChatClient::new(&server.url());

    let reply = client
        .send_chat(&ChatRequest::new("users", "http://shop.local/api/swagger.json"))
        .await
        .unwrap();

    assert_eq!(reply.message, "users @ http://shop.local/api/swagger.json");
}

#[tokio::test]
async fn test_health_and_ready_probes() {
    let server = TestServer::start(Arc::new(EchoResponder)).await;
    let client = ChatClient::new(&server.url());

    let health = client.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(client.ready().await.unwrap().message, "Chat endpoint ready");
}

#[tokio::test]
async fn test_responder_error_is_500() {
    let server = TestServer::start(Arc::new(FailingResponder)).await;
    let client = ChatClient::new(&server.url());

    let err = client
        .send_chat(&ChatRequest::new("Hello", ""))
        .await
        .unwrap_err();

    match err {
        Error::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("backend unavailable"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_message_is_rejected() {
    let server = TestServer::start(Arc::new(EchoResponder)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/chat", server.url()))
        .json(&serde_json::json!({ "api_spec_url": "x" }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = TestServer::start(Arc::new(EchoResponder)).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/api/chat", server.url()))
        .header("Origin", "https://host.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_widget_against_live_endpoint() {
    let server = TestServer::start(Arc::new(EchoResponder)).await;
    let config = WidgetConfig::new(server.url());
    let client = ChatClient::new(&config.api_url);
    let widget = Widget::initialize(config, client, MemoryStore::new(), NullRenderer);

    let outcome = widget.send_message("Hello").await;

    assert_eq!(
        outcome,
        SendOutcome::Replied("AI Bot: Отримано запит: \"Hello\"".to_string())
    );
    let history = widget.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role(), Role::Bot);
    assert_eq!(history[1].text(), "Hello");
    assert_eq!(history[2].text(), "AI Bot: Отримано запит: \"Hello\"");
}

#[tokio::test]
async fn test_widget_against_failing_endpoint() {
    let server = TestServer::start(Arc::new(FailingResponder)).await;
    let config = WidgetConfig {
        language: "en".to_string(),
        ..WidgetConfig::new(server.url())
    };
    let client = ChatClient::new(&config.api_url);
    let widget = Widget::initialize(config, client, MemoryStore::new(), NullRenderer);

    assert_eq!(widget.send_message("Hello").await, SendOutcome::Failed);
    assert_eq!(
        widget.history().last().unwrap().text(),
        "Sorry, something went wrong. Please try again."
    );
}
