//! The chat widget and the handles it is wired to.
//!
//! # Architecture
//!
//! - [`ChatWidget`]: input controller and query dispatcher
//! - [`InputField`] / [`MessageLog`]: injected input and render target
//! - [`TextInput`], [`MessageBoard`], [`TranscriptLog`]: concrete handles
//!
//! # Example
//!
//! ```rust
//! use query_chat::widget::{ChatWidget, KeyPress, MessageBoard, TextInput, ENTER};
//! # use query_chat::client::HttpAskClient;
//!
//! # fn example() -> query_chat::Result<()> {
//! let widget = ChatWidget::new(
//!     TextInput::new(),
//!     MessageBoard::new(),
//!     HttpAskClient::new("http://localhost:8080")?,
//! );
//!
//! // Blank input never reaches the backend.
//! widget.input().set_value("   ");
//! let mut event = KeyPress::new(ENTER);
//! assert!(widget.on_key_press(&mut event).is_none());
//! assert!(widget.log().is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod chat;
mod dom;

pub use chat::{ChatWidget, DispatchOutcome, ENTER, KeyPress};
pub use dom::{InputField, MessageBoard, MessageLog, TextInput, TranscriptLog};
