//! Background eviction of idle in-memory sessions.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use convo_core::history::MemoryStore;

/// Run `sweep_idle(max_idle)` every `every` until `cancel` fires.
pub fn spawn_idle_sweeper(
    store: MemoryStore,
    max_idle: Duration,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = store.sweep_idle(max_idle);
                    if removed > 0 {
                        tracing::info!(
                            removed,
                            remaining = store.session_count(),
                            "Evicted idle sessions"
                        );
                    }
                }
            }
        }
        tracing::debug!("Idle session sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_core::history::HistoryStore;
    use convo_types::message::Message;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_idle_sessions_and_stops_on_cancel() {
        let store = MemoryStore::new(4);
        store.add_message("idle", Message::user("x")).await.unwrap();

        let cancel = CancellationToken::new();
        let handle = spawn_idle_sweeper(
            store.clone(),
            Duration::from_secs(30),
            Duration::from_secs(10),
            cancel.clone(),
        );

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(store.session_count(), 0);

        cancel.cancel();
        handle.await.unwrap();
    }
}
