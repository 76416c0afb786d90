#![deny(missing_docs)]

//! # Chatline Models
//!
//! Data types shared by the Chatline client crates: the JSON bodies
//! exchanged with the chat backend and the messages rendered in the log.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /status           -> StatusSnapshot
//! POST /chat             ChatRequest -> ChatReply (2xx) | ChatErrorBody (non-2xx)
//! POST /debug/set_key    SetKeyRequest -> KeyStatus
//! POST /debug/clear_key  -> KeyStatus
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`endpoint`] | Validated backend base URL |
//! | [`status`] | `StatusSnapshot`, `StatusMode`, status labels |
//! | [`chat`] | Chat request / reply / error bodies and `ChatOutcome` |
//! | [`admin`] | Debug key management bodies |
//! | [`message`] | Rendered log entries (`Message`, `Role`, `MessageKind`) |

pub mod admin;
pub mod chat;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod status;

// Re-export all public types at crate root for convenience.
pub use admin::*;
pub use chat::*;
pub use endpoint::*;
pub use error::*;
pub use message::*;
pub use status::*;
