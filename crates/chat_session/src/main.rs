use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chat_api::{ChatApiClient, ChatApiConfig, StaticToken};
use chat_session::config::SessionConfig;
use chat_session::{ChatController, ConversationSession, LoginRedirect, Message, Role, SessionHost};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct TerminalHost {
    logged_out: AtomicBool,
}

impl SessionHost for TerminalHost {
    fn request_render(&self) {}

    fn navigate_to_login(&self, redirect: LoginRedirect) {
        eprintln!("Please sign in again ({}).", redirect.path());
        self.logged_out.store(true, Ordering::Release);
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::from_env();
    let credentials = Arc::new(StaticToken::from_option(config.token.clone()));
    let client = ChatApiClient::new(ChatApiConfig::from_env(), credentials).map_err(io::Error::other)?;

    let host = Arc::new(TerminalHost::default());
    let controller = ChatController::new(
        ConversationSession::new(config.user_id.clone()),
        Arc::new(client),
        Arc::clone(&host) as Arc<dyn SessionHost>,
    )
    .with_mode(config.mode);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }

        controller.submit(&line).await;

        let session = controller.session();
        for message in &session.history()[shown..] {
            print_message(message);
        }
        shown = session.history().len();
        if let Some(error) = session.error_text() {
            eprintln!("error: {error}");
        }
        drop(session);

        if host.logged_out.load(Ordering::Acquire) {
            break;
        }
    }

    Ok(())
}

fn print_message(message: &Message) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let time = message.timestamp;
    println!(
        "[{:02}:{:02}] {who}: {}",
        time.hour(),
        time.minute(),
        message.content
    );
    for tool in &message.tool_calls {
        let mark = if tool.success { "ok" } else { "failed" };
        println!("    {} ({mark})", tool.display_label());
    }
}
