//! Summary model: an AI digest of recent updates. Never persisted.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub text: String,
    /// Number of updates fed into the prompt.
    pub update_count: usize,
}
