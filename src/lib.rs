//! Query Chat Widget
//!
//! A small chat widget that sends user questions to a query backend and
//! renders the answer, plus an optional table of result rows, into an
//! append-only message log.
//!
//! # Architecture
//!
//! - **Widget**: input controller and query dispatcher over injected handles
//! - **Backend**: `POST /ask` round-trips through a pluggable [`client::AskBackend`]
//! - **Render**: escaped HTML bubbles and result tables
//!
//! # Modules
//!
//! - [`client`]: Backend trait and the `reqwest` HTTP implementation
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`message`]: Chat messages and wire payloads
//! - [`render`]: Bubble, table and page markup
//! - [`widget`]: The chat widget and its DOM handles
//!
//! # Example
//!
//! ```rust,no_run
//! use query_chat::client::HttpAskClient;
//! use query_chat::widget::{ChatWidget, MessageBoard, TextInput};
//!
//! # async fn example() -> query_chat::Result<()> {
//! let backend = HttpAskClient::new("http://localhost:8080")?;
//! let widget = ChatWidget::new(TextInput::new(), MessageBoard::new(), backend);
//!
//! widget.input().set_value("How many orders shipped last week?");
//! if let Some(dispatch) = widget.send_query() {
//!     let outcome = dispatch.await?;
//!     println!("{}", outcome.reply.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod render;
pub mod widget;

pub use error::{Error, Result};
