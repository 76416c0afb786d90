//! # Chatline Widget
//!
//! A chat widget controller that is independent of any UI toolkit. The
//! host draws [`ChatWidget`]'s log, input box and status line however it
//! likes, translates key presses into [`KeyInput`], and runs network calls
//! through a [`ChatBackend`](chatline_sdk::ChatBackend).
//!
//! ```rust,no_run
//! use chatline_sdk::ChatApiClient;
//! use chatline_widget::{ChatWidget, WidgetConfig};
//!
//! # async fn run() -> Result<(), chatline_sdk::SdkError> {
//! let backend = ChatApiClient::from_url("http://127.0.0.1:5000")?;
//! let mut widget = ChatWidget::new(WidgetConfig::default());
//!
//! widget.load_status(&backend).await;
//! widget.input_mut().set_text("hola");
//! widget.send(&backend).await;
//!
//! for message in widget.log().messages() {
//!     println!("{} {}", message.role.avatar(), message.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod input;
pub mod log;
pub mod widget;
pub mod wrap;

pub use config::WidgetConfig;
pub use input::{InputBox, InputOutcome, Key, KeyInput};
pub use log::ChatLog;
pub use widget::{
    ChatWidget, FallbackNotice, PendingSend, RequestToken, SendReport, SendSkipped,
    STATUS_LOADING,
};
pub use wrap::wrap;
