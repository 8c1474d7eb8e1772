//! Terminal chat client for the animation API.
//!
//! Type a request and press Enter. End a line with `\` to keep writing on the
//! next line. `/attach <path>` adds an image, `/detach` removes it and
//! `/quit` exits.

mod client;
mod error;
mod session;

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::client::{ChatApiClient, ChatClientConfig};
use crate::session::{format_message, Action, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let client = ChatApiClient::new(ChatClientConfig::from_env())
        .context("Failed to build HTTP client")?;
    info!(url = %client.base_url(), "Chat client ready");

    println!("Describe the animation you want. /quit to exit.");

    let mut session = Session::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&session)?;
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match session.handle_line(&line) {
            Action::Continue => {}
            Action::Notice(notice) => println!("  {notice}"),
            Action::Quit => break,
            Action::Submit(submission) => {
                if let Some(image) = &submission.image {
                    println!("  {} stays local; only the text is sent", image.preview());
                }

                let user = session.transcript.begin_request(submission.text.clone());
                println!("{}", format_message(user));
                println!("  generating...");

                match client.send(&submission.text).await {
                    Ok(links) => {
                        let added = session.transcript.complete_with_links(links);
                        if added.is_empty() {
                            println!("  no frames were rendered");
                        }
                        for message in added {
                            println!("{}", format_message(message));
                        }
                    }
                    Err(e) => {
                        if e.is_connection() {
                            warn!(error = %e, "Chat server unreachable");
                        } else {
                            warn!(error = %e, "Chat request failed");
                        }
                        println!("{}", format_message(session.transcript.complete_with_error()));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Show `>` for a fresh draft and `.` while continuing one.
fn prompt(session: &Session) -> anyhow::Result<()> {
    let marker = if session.input.draft().is_empty() { ">" } else { "." };
    let mut stdout = std::io::stdout();
    write!(stdout, "{marker} ")?;
    stdout.flush()?;
    Ok(())
}

/// Logs go to stderr so they never interleave with the transcript.
fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("animchat=warn".parse().context("Invalid log directive")?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();

    Ok(())
}
