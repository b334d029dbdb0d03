//! # questionnaire-sync
//!
//! Drive a respondent through a questionnaire while keeping their answers in
//! sync with a remote store.
//!
//! A [`ResponseSession`] holds the answers of one open questionnaire. Every
//! edit is debounced into an auto-save; identical snapshots are never written
//! twice; explicit saves and completion bypass the debounce and report their
//! failures. The store itself is abstracted behind [`PersistenceGateway`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use questionnaire_sync::{ResponseSession, SyncConfig};
//!
//! let mut session = ResponseSession::load(gateway, "intake-2024", SyncConfig::default()).await?;
//!
//! // Auto-saved two seconds after the last edit.
//! session.set_answer("name", Some("Ana".into()), false).await?;
//!
//! // Saved immediately, then moves to the next question.
//! session.set_answer("consent", Some(true.into()), true).await?;
//!
//! session.complete().await?;
//! ```
//!
//! ## Lifecycle
//!
//! `pending` → `in_progress` (first persisted save) → `completed` (explicit
//! completion). `completed` is terminal: every mutating call afterwards
//! returns [`SessionError::Completed`].

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod config;
pub use config::{DEFAULT_ADVANCE_DELAY, DEFAULT_AUTOSAVE_DELAY, SyncConfig};

mod error;
pub use error::SessionError;

mod fingerprint;
pub use fingerprint::Fingerprint;

mod gateway;
pub use gateway::{PersistenceGateway, PriorAnswer, RemoteSession, SaveRequest};

mod notice;
pub use notice::Notice;

mod scheduler;
pub use scheduler::{AutoSaveScheduler, FlushOutcome};

mod session;
pub use session::{
    AnswerOutcome, ExitChoice, ExitOutcome, ExitPrompt, ResponseSession, SessionView, ViewMode,
};

// In-memory gateway for testing sessions without a server
mod memory_gateway;
pub use memory_gateway::{MemoryGateway, MemoryGatewayError, RecordedWrite};
