//! The chat widget: input controller plus query dispatcher.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::client::AskBackend;
use crate::error::Result;
use crate::message::{Message, QueryRequest};
use crate::render::render_bubble;

use super::dom::{InputField, MessageLog};

/// Key that submits the query.
pub const ENTER: &str = "Enter";

/// A key-press event delivered to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    key: String,
    default_prevented: bool,
}

impl KeyPress {
    /// A fresh event for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default_prevented: false,
        }
    }

    /// The pressed key, e.g. `"Enter"`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Suppress the default form submission.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler suppressed the default behavior.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of a dispatch that got a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Sequence number shared by the user and assistant bubbles.
    pub dispatch_id: u64,
    /// The trimmed query that was sent.
    pub query: String,
    /// The assistant message appended to the log.
    pub reply: Message,
}

/// Chat widget over an input, a message log and a query backend.
///
/// All three handles are injected, so the widget runs against the in-memory
/// [`TextInput`](super::TextInput) and [`MessageBoard`](super::MessageBoard)
/// as readily as against a terminal transcript.
///
/// Dispatches are not serialized. Each one is numbered, and its user and
/// assistant bubbles carry that number in `data-dispatch`; assistant bubbles
/// land in the order responses resolve.
#[derive(Debug)]
pub struct ChatWidget<I, L, B> {
    input: I,
    log: L,
    backend: B,
    /// Messages in the order they were appended.
    history: RwLock<Vec<Message>>,
    last_dispatch: AtomicU64,
}

impl<I, L, B> ChatWidget<I, L, B>
where
    I: InputField,
    L: MessageLog,
    B: AskBackend,
{
    /// Create a widget bound to the given handles.
    pub fn new(input: I, log: L, backend: B) -> Self {
        Self {
            input,
            log,
            backend,
            history: RwLock::new(Vec::new()),
            last_dispatch: AtomicU64::new(0),
        }
    }

    /// The bound input.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// The bound message log.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// The backend queries are sent to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of every message appended so far.
    pub fn messages(&self) -> Vec<Message> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Handle a key press on the input.
    ///
    /// `Enter` prevents the default action and submits the query once;
    /// any other key is ignored and the event is left untouched. Returns the
    /// pending dispatch, if one was started.
    pub fn on_key_press<'a>(
        &'a self,
        event: &mut KeyPress,
    ) -> Option<impl Future<Output = Result<DispatchOutcome>> + use<'a, I, L, B>> {
        if event.key() != ENTER {
            return None;
        }
        event.prevent_default();
        self.send_query()
    }

    /// Submit the current input value.
    ///
    /// Returns `None` without touching anything when the trimmed input is
    /// empty. Otherwise the input is cleared and the user bubble appended
    /// before this returns; the returned future performs the request and
    /// appends the reply (or an error bubble) when it resolves.
    pub fn send_query(&self) -> Option<impl Future<Output = Result<DispatchOutcome>> + '_> {
        let query = self.input.value().trim().to_string();
        if query.is_empty() {
            debug!(name: "widget.query.empty", "Ignoring empty query");
            return None;
        }

        self.input.clear();
        let dispatch_id = self.last_dispatch.fetch_add(1, Ordering::Relaxed) + 1;
        self.push(Message::user(dispatch_id, query.as_str()));

        Some(self.dispatch(dispatch_id, query))
    }

    async fn dispatch(&self, dispatch_id: u64, query: String) -> Result<DispatchOutcome> {
        info!(
            name: "widget.dispatch.sent",
            dispatch_id,
            query_len = query.len(),
            "Query dispatched"
        );

        let request = QueryRequest { query };
        match self.backend.ask(&request).await {
            Ok(response) => {
                let reply = Message::assistant(dispatch_id, &response);
                info!(
                    name: "widget.dispatch.answered",
                    dispatch_id,
                    rows = reply.table_rows.as_ref().map_or(0, Vec::len),
                    "Query answered"
                );
                self.push(reply.clone());
                Ok(DispatchOutcome {
                    dispatch_id,
                    query: request.query,
                    reply,
                })
            }
            Err(e) => {
                warn!(
                    name: "widget.dispatch.failed",
                    dispatch_id,
                    error = %e,
                    "Query dispatch failed"
                );
                self.push(Message::error(dispatch_id, &e));
                Err(e)
            }
        }
    }

    /// Render, append and scroll.
    ///
    /// The history lock is held across the log update so `messages()` and
    /// the log always agree on order.
    fn push(&self, message: Message) {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        self.log.append(&render_bubble(&message));
        self.log.scroll_to_latest();
        history.push(message);
    }
}
