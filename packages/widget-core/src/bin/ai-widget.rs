//! AI Widget CLI - chat with the endpoint from a terminal.
//!
//! Every line typed is sent as a message. Lines starting with `/` are
//! commands: `/toggle`, `/hide`, `/show`, `/clear`, `/health`, `/quit`.

use ai_widget_core::{
    ChatClient, ChatMessage, FileStore, Renderer, Role, Widget, WidgetConfig, WidgetFrame,
};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ai-widget")]
#[command(about = "Terminal front end for the AI chat widget")]
#[command(version)]
struct Cli {
    /// Config file (JSON or TOML)
    #[arg(short, long, env = "AI_WIDGET_CONFIG")]
    config: Option<PathBuf>,

    /// Override the endpoint base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Override the display language
    #[arg(long)]
    language: Option<String>,

    /// Directory for the persisted history
    #[arg(long, env = "AI_WIDGET_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,
}

/// Prints the transcript to stdout.
struct TerminalRenderer {
    title: String,
    typing_label: String,
    minimized: bool,
    visible: bool,
}

impl TerminalRenderer {
    fn new() -> Self {
        Self {
            title: String::new(),
            typing_label: String::new(),
            minimized: false,
            visible: true,
        }
    }

    fn drawing(&self) -> bool {
        self.visible && !self.minimized
    }
}

impl Renderer for TerminalRenderer {
    fn mount(&mut self, frame: &WidgetFrame) {
        self.title = frame.title.clone();
        self.typing_label = frame.typing_label.clone();
        println!("== {} ==", frame.title);
        println!("   {} ({})", frame.subtitle, frame.position);
    }

    fn render(&mut self, message: &ChatMessage) {
        if !self.drawing() {
            return;
        }
        let who = match message.role() {
            Role::User => "you",
            Role::Bot => self.title.as_str(),
        };
        println!("[{}] {}: {}", message.timestamp().format("%H:%M"), who, message.text());
    }

    fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
        println!("{}", if minimized { "(minimized)" } else { "(expanded)" });
    }

    fn set_typing(&mut self, visible: bool) {
        if visible && self.drawing() {
            println!("{}", self.typing_label);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn clear(&mut self) {
        println!("(history cleared)");
    }

    fn destroy(&mut self) {
        println!("(bye)");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WidgetConfig::load_from_path(path)?,
        None => WidgetConfig::load()?,
    };
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }

    let store = match cli.storage_dir {
        Some(dir) => FileStore::with_dir(dir),
        None => FileStore::new(),
    };

    let client = ChatClient::new(&config.api_url);
    let widget = Widget::initialize(config, client.clone(), store, TerminalRenderer::new());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/toggle" => {
                widget.toggle();
            }
            "/hide" => widget.hide(),
            "/show" => widget.show(),
            "/clear" => widget.clear_history(),
            "/health" => match client.health().await {
                Ok(health) => println!("health: {} at {}", health.status, health.timestamp),
                Err(e) => println!("health: unreachable ({e})"),
            },
            text => {
                widget.send_message(text).await;
            }
        }
    }

    widget.destroy();
    Ok(())
}
