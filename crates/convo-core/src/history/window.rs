//! Sliding-window truncation shared by every history backend.

use convo_types::message::Message;

/// Drop messages from the front until at most `max_messages` remain.
///
/// Returns how many messages were dropped. The most recent message is never
/// dropped while `max_messages >= 1`.
pub fn enforce_window(messages: &mut Vec<Message>, max_messages: usize) -> usize {
    let excess = messages.len().saturating_sub(max_messages);
    if excess > 0 {
        messages.drain(..excess);
    }
    excess
}

/// Append `new` in order, then truncate to the window.
///
/// Equivalent to appending each message and truncating after every append.
pub fn append_windowed(
    messages: &mut Vec<Message>,
    new: impl IntoIterator<Item = Message>,
    max_messages: usize,
) -> usize {
    messages.extend(new);
    enforce_window(messages, max_messages)
}
