use super::Item;
use serde::{Deserialize, Serialize};

/// Parameters for a select-by-query call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectRequest {
    /// The select expression to evaluate
    pub select_expression: String,

    /// Request a strongly consistent read
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub consistent_read: bool,

    /// Continuation cursor from a previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl SelectRequest {
    /// Build a request from an expression.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            select_expression: expression.into(),
            consistent_read: false,
            next_token: None,
        }
    }

    /// Request a strongly consistent read.
    #[must_use]
    pub const fn consistent(mut self) -> Self {
        self.consistent_read = true;
        self
    }

    /// Resume from a continuation cursor.
    #[must_use]
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}

/// Items matching a select expression.
///
/// The service sizes pages itself; a `next_token` means the expression
/// matched more items than fit in this response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectResult {
    /// Matching items with their selected attributes
    #[serde(default)]
    pub items: Vec<Item>,

    /// Cursor for the next page of matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl SelectResult {
    /// Returns true if another page of matches can be fetched.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}
