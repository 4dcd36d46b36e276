//! Summary service: digests the last 24 hours of updates through the completion client.

use std::sync::Arc;

use chrono::Duration;

use super::SharedClock;
use crate::completion::CompletionClient;
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Summary, Update};

/// Length of the lookback window.
pub const SUMMARY_WINDOW_HOURS: i64 = 24;

const NO_RECENT_UPDATES: &str = "No updates found in the last 24 hours";

pub struct SummaryService {
    repo: Arc<Repository>,
    completion: Arc<dyn CompletionClient>,
    clock: SharedClock,
    model: String,
}

impl SummaryService {
    pub fn new(
        repo: Arc<Repository>,
        completion: Arc<dyn CompletionClient>,
        clock: SharedClock,
        model: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            completion,
            clock,
            model: model.into(),
        }
    }

    /// Summarize every update created within the window ending now.
    ///
    /// The whole window goes into one prompt; nothing is truncated.
    pub async fn summarize(&self) -> Result<Summary, AppError> {
        let cutoff = self.clock.utc() - Duration::hours(SUMMARY_WINDOW_HOURS);
        let updates = self.repo.list_updates_since(cutoff).await?;

        if updates.is_empty() {
            return Err(AppError::NoContent(NO_RECENT_UPDATES.to_string()));
        }

        let prompt = build_prompt(&updates);
        tracing::info!(
            update_count = updates.len(),
            model = %self.model,
            "Generating summary"
        );

        let text = self.completion.complete(&prompt, &self.model).await?;

        Ok(Summary {
            text,
            update_count: updates.len(),
        })
    }
}

/// Render updates as `user: title - content` lines inside the digest instruction.
pub fn build_prompt(updates: &[Update]) -> String {
    let lines = updates
        .iter()
        .map(|u| format!("{}: {} - {}", u.user, u.title, u.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Please provide a concise summary of the following team updates from the last 24 hours:\n\n{lines}\n\nSummary:"
    )
}
