//! History stores, session routing and chat orchestration for convo.
//!
//! This crate defines the "ports" (`HistoryStore`, `KeyValueCache`,
//! `LlmProvider`) and the logic built on them. It depends only on
//! `convo-types` -- never on `convo-infra` or any network client crate.

pub mod chat;
pub mod history;
pub mod llm;
pub mod storage;
