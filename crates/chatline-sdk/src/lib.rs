//! # Chatline SDK
//!
//! Client for the Chatline chat backend.
//!
//! The SDK provides:
//!
//! * [`ChatApiClient`]: JSON-over-HTTP client for `/status`, `/chat` and
//!   the debug key endpoints.
//! * [`ChatBackend`]: the trait front-ends program against, so tests can
//!   swap in an in-memory backend.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! Wire types from [`chatline_models`] are re-exported for convenience.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::ChatBackend;
pub use client::ChatApiClient;
pub use error::SdkError;

pub use chatline_models::{ChatErrorBody, ChatOutcome, KeyStatus, StatusSnapshot};
