//! `thinkloop chat` — stream one completion to stdout.

use std::io::Write;

use thinkloop_core::message::Message;
use thinkloop_core::provider::CompletionOptions;

pub async fn run(prompt: &str, system: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, provider) = super::load_gateway()?;

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(prompt));

    let mut stream = provider
        .stream(&messages, &CompletionOptions::default())
        .await?;

    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        write!(stdout, "{}", fragment?)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;

    Ok(())
}
