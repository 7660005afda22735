//! HTML rendering for bubbles, result tables and the widget page.
//!
//! Every piece of dynamic text (queries, answers, column names, cell values,
//! page title) passes through [`html_escape::encode_text`].

use std::borrow::Cow;

use html_escape::encode_text;
use serde_json::Value;

use crate::message::{Message, Row};

/// Render rows as a table.
///
/// Columns come from the first row, in its key order. Later rows are
/// rendered against that column list; missing keys become empty cells.
/// Returns an empty string when there are no rows.
pub fn render_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut table = String::from("<table><tr>");
    for column in &columns {
        table.push_str(&format!("<th>{}</th>", encode_text(column)));
    }
    table.push_str("</tr>");

    for row in rows {
        table.push_str("<tr>");
        for column in &columns {
            let cell = row.get(*column).map(cell_text).unwrap_or_default();
            table.push_str(&format!("<td>{}</td>", encode_text(&cell)));
        }
        table.push_str("</tr>");
    }

    table.push_str("</table>");
    table
}

/// Display text of a cell value.
fn cell_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Render one message bubble.
pub fn render_bubble(message: &Message) -> String {
    let table = message
        .table_rows
        .as_deref()
        .map(render_table)
        .unwrap_or_default();

    format!(
        r#"<div class="message {class}" data-dispatch="{dispatch}">
  <div class="label">{label}</div>
  <div class="bubble">{text}{table}</div>
</div>"#,
        class = message.role.css_class(),
        dispatch = message.dispatch_id,
        label = message.role.label(),
        text = encode_text(&message.text),
    )
}

/// Opening half of the widget page, up to the inside of `#messages`.
pub fn page_header(title: &str) -> String {
    let title = encode_text(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
</head>
<body>
    <div class="chat">
        <div id="messages" class="messages">
"#
    )
}

/// Closing half of the widget page, including the query input.
pub fn page_footer() -> &'static str {
    r#"        </div>
        <input id="queryInput" type="text" placeholder="Ask a question..." autocomplete="off">
    </div>
</body>
</html>
"#
}

/// Render a full page around already rendered bubbles.
pub fn render_page(title: &str, bubbles: &str) -> String {
    format!("{}{bubbles}\n{}", page_header(title), page_footer())
}
