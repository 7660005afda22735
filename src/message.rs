//! Chat messages and the `/ask` wire payloads.
//!
//! The backend is free to send any JSON shape. [`QueryResponse::from_value`]
//! keeps whatever `answer` and `data` fields it finds and the accessors
//! decide how they are shown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Text shown when the backend sends no usable answer.
pub const NO_ANSWER: &str = "No answer";

/// One result row: column name to scalar, in the backend's key order.
pub type Row = Map<String, Value>;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the widget.
    User,
    /// A reply from the query backend.
    Assistant,
    /// A dispatch that never got a reply.
    Error,
}

impl Role {
    /// Label rendered above the bubble.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
            Self::Error => "Error",
        }
    }

    /// CSS class of the message container.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user-message",
            Self::Assistant => "assistant-message",
            Self::Error => "error-message",
        }
    }
}

/// A single chat message. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sequence number of the dispatch that produced this message.
    pub dispatch_id: u64,
    /// Who wrote it.
    pub role: Role,
    /// Plain message text (unescaped).
    pub text: String,
    /// Result rows attached to an assistant reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_rows: Option<Vec<Row>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(dispatch_id: u64, role: Role, text: String, table_rows: Option<Vec<Row>>) -> Self {
        Self {
            dispatch_id,
            role,
            text,
            table_rows,
            created_at: Utc::now(),
        }
    }

    /// The user's query as submitted.
    pub fn user(dispatch_id: u64, query: impl Into<String>) -> Self {
        Self::new(dispatch_id, Role::User, query.into(), None)
    }

    /// The assistant reply built from a backend response.
    pub fn assistant(dispatch_id: u64, response: &QueryResponse) -> Self {
        Self::new(
            dispatch_id,
            Role::Assistant,
            response.answer_text(),
            response.rows(),
        )
    }

    /// The failure notice for a dispatch whose round-trip failed.
    pub fn error(dispatch_id: u64, error: &Error) -> Self {
        Self::new(
            dispatch_id,
            Role::Error,
            format!("Request failed: {error}"),
            None,
        )
    }
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Trimmed user query.
    pub query: String,
}

/// Body returned by `POST /ask`.
///
/// Both fields are kept as raw JSON; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Answer text, normally a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    /// Result rows, normally an array of objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl QueryResponse {
    /// Build a response from any JSON document. Non-objects carry no fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                answer: map.remove("answer"),
                data: map.remove("data"),
            },
            _ => Self::default(),
        }
    }

    /// The answer to display, or [`NO_ANSWER`] when it is absent or falsy.
    pub fn answer_text(&self) -> String {
        match &self.answer {
            None | Some(Value::Null | Value::Bool(false)) => NO_ANSWER.to_string(),
            Some(Value::String(text)) if text.is_empty() => NO_ANSWER.to_string(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => NO_ANSWER.to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Rows to render as a table, only when `data` is a non-empty array.
    ///
    /// Elements that are not objects become empty rows.
    pub fn rows(&self) -> Option<Vec<Row>> {
        match &self.data {
            Some(Value::Array(items)) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(row) => row.clone(),
                        _ => Row::new(),
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = QueryRequest {
            query: "top products".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query":"top products"}"#);
    }

    #[test]
    fn test_answer_defaults() {
        assert_eq!(QueryResponse::from_value(json!({})).answer_text(), NO_ANSWER);
        assert_eq!(
            QueryResponse::from_value(json!({"answer": null})).answer_text(),
            NO_ANSWER
        );
        assert_eq!(
            QueryResponse::from_value(json!({"answer": ""})).answer_text(),
            NO_ANSWER
        );
        assert_eq!(
            QueryResponse::from_value(json!({"answer": false})).answer_text(),
            NO_ANSWER
        );
        assert_eq!(
            QueryResponse::from_value(json!({"answer": 0})).answer_text(),
            NO_ANSWER
        );
    }

    #[test]
    fn test_answer_text() {
        let response = QueryResponse::from_value(json!({"answer": "42"}));
        assert_eq!(response.answer_text(), "42");

        let response = QueryResponse::from_value(json!({"answer": 42}));
        assert_eq!(response.answer_text(), "42");
    }

    #[test]
    fn test_non_object_body() {
        let response = QueryResponse::from_value(json!(["answer", "data"]));
        assert_eq!(response, QueryResponse::default());
        assert_eq!(response.answer_text(), NO_ANSWER);
        assert!(response.rows().is_none());
    }

    #[test]
    fn test_rows() {
        let response = QueryResponse::from_value(json!({"data": []}));
        assert!(response.rows().is_none());

        let response = QueryResponse::from_value(json!({"data": "not rows"}));
        assert!(response.rows().is_none());

        let response = QueryResponse::from_value(json!({"data": [{"b": 1, "a": 2}, 7]}));
        let rows = response.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(rows[1].is_empty());
    }

    #[test]
    fn test_message_constructors() {
        let user = Message::user(3, "hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.dispatch_id, 3);
        assert!(user.table_rows.is_none());

        let reply = Message::assistant(
            3,
            &QueryResponse::from_value(json!({"answer": "hi", "data": [{"a": 1}]})),
        );
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text, "hi");
        assert_eq!(reply.table_rows.unwrap().len(), 1);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Error.css_class(), "error-message");
    }
}
