//! Wire encoding for histories kept in a key-value cache.
//!
//! A history is stored as a UTF-8 JSON array of
//! `{"type": "human" | "ai", "content": "..."}` records, oldest first.
//! Unknown extra fields on a record are ignored; an unknown `type` tag is
//! an error, never silently dropped.

use serde::{Deserialize, Serialize};

use convo_types::error::HistoryError;
use convo_types::message::{Message, MessageRole};

const HUMAN: &str = "human";
const AI: &str = "ai";

#[derive(Serialize)]
struct StoredMessageRef<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct StoredMessage {
    #[serde(rename = "type")]
    kind: String,
    content: String,
}

fn role_tag(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => HUMAN,
        MessageRole::Assistant => AI,
    }
}

fn role_from_tag(tag: &str) -> Result<MessageRole, HistoryError> {
    match tag {
        HUMAN => Ok(MessageRole::User),
        AI => Ok(MessageRole::Assistant),
        other => Err(HistoryError::Corrupt(format!(
            "unknown message type '{other}'"
        ))),
    }
}

/// Serialize a history into its stored JSON form.
pub fn encode_history(messages: &[Message]) -> Result<String, HistoryError> {
    let records: Vec<StoredMessageRef<'_>> = messages
        .iter()
        .map(|m| StoredMessageRef {
            kind: role_tag(m.role),
            content: &m.content,
        })
        .collect();

    serde_json::to_string(&records)
        .map_err(|e| HistoryError::Corrupt(format!("failed to encode history: {e}")))
}

/// Parse a stored JSON history back into messages.
pub fn decode_history(raw: &str) -> Result<Vec<Message>, HistoryError> {
    let records: Vec<StoredMessage> = serde_json::from_str(raw)
        .map_err(|e| HistoryError::Corrupt(format!("invalid history encoding: {e}")))?;

    records
        .into_iter()
        .map(|r| Ok(Message::new(role_from_tag(&r.kind)?, r.content)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_type_tags() {
        let raw = encode_history(&[Message::user("hi"), Message::assistant("hello")]).unwrap();
        assert_eq!(
            raw,
            r#"[{"type":"human","content":"hi"},{"type":"ai","content":"hello"}]"#
        );
    }

    #[test]
    fn roundtrip_preserves_order_and_roles() {
        let history = vec![
            Message::user("U1"),
            Message::assistant("A1"),
            Message::user("U2 with \"quotes\" and ünïcode"),
            Message::assistant(""),
        ];
        let decoded = decode_history(&encode_history(&history).unwrap()).unwrap();
        assert_eq!(decoded, history);
    }

    #[test]
    fn empty_array_decodes_to_empty_history() {
        assert!(decode_history("[]").unwrap().is_empty());
    }

    #[test]
    fn unknown_type_tag_is_corrupt() {
        let err = decode_history(r#"[{"type":"tool","content":"x"}]"#).unwrap_err();
        assert!(matches!(err, HistoryError::Corrupt(msg) if msg.contains("tool")));
    }

    #[test]
    fn non_array_payload_is_corrupt() {
        assert!(matches!(
            decode_history(r#"{"type":"human","content":"x"}"#),
            Err(HistoryError::Corrupt(_))
        ));
        assert!(matches!(decode_history("not json"), Err(HistoryError::Corrupt(_))));
    }

    #[test]
    fn missing_content_is_corrupt() {
        assert!(matches!(
            decode_history(r#"[{"type":"human"}]"#),
            Err(HistoryError::Corrupt(_))
        ));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"[{"type":"ai","content":"ok","data":{"id":null}}]"#;
        assert_eq!(decode_history(raw).unwrap(), vec![Message::assistant("ok")]);
    }
}
