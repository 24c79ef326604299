//! `convo history` commands, run directly against the configured store.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::style;

use convo_core::history::SessionHistoryManager;
use convo_types::config::{HistoryBackend, ServiceConfig};
use convo_types::message::{Message, MessageRole};

use crate::state::build_store;

async fn manager(config: &ServiceConfig) -> anyhow::Result<SessionHistoryManager> {
    if config.history.backend == HistoryBackend::Memory {
        eprintln!(
            "  {} The memory backend lives inside the server process; this command sees an empty store.",
            style("!").yellow().bold()
        );
    }
    let handle = build_store(&config.history).await?;
    Ok(SessionHistoryManager::new(handle.store))
}

/// Print a session's history as a table or JSON.
pub async fn show(config: &ServiceConfig, session_id: &str, json: bool) -> anyhow::Result<()> {
    let messages = manager(config)
        .await?
        .resolve(session_id)?
        .messages()
        .await?;

    if json {
        let out = serde_json::json!({
            "session_id": session_id,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  No messages for session '{}'.", style(session_id).cyan());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", render_table(&messages));
    println!(
        "  {} message(s), limit {}",
        messages.len(),
        config.history.max_messages
    );
    println!();
    Ok(())
}

/// Reset a session to empty.
pub async fn clear(config: &ServiceConfig, session_id: &str, json: bool) -> anyhow::Result<()> {
    manager(config).await?.resolve(session_id)?.clear().await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "session_id": session_id, "cleared": true })
        );
    } else {
        println!(
            "  {} Cleared history for '{}'",
            style("✓").green(),
            style(session_id).cyan()
        );
    }
    Ok(())
}

fn render_table(messages: &[Message]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Role", "Content"]);

    for (i, message) in messages.iter().enumerate() {
        let role = match message.role {
            MessageRole::User => style("user").blue().to_string(),
            MessageRole::Assistant => style("assistant").green().to_string(),
        };
        table.add_row(vec![(i + 1).to_string(), role, message.content.clone()]);
    }
    table
}
