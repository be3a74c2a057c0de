//! fetchUserInsights tool.
//!
//! Summarizes the configured user's journal from four independent store
//! reads. The reads run concurrently and the summary is all-or-nothing: if any
//! read fails, no partial counts are returned.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::clients::{JournalQuery, JournalRow, JournalStore, StoreError};
use crate::domains::tools::{
    NamedValue, ToolDefinition, ToolError, ToolOutput, gather_all_or_fail, with_timeout,
};

/// The tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FetchUserInsightsParams {}

/// Counts derived from the four reads.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSummary {
    pub entries_today: usize,
    pub latest_score: Option<f64>,
    pub weekly_points: usize,
    pub documents: usize,
}

impl From<InsightSummary> for ToolOutput {
    fn from(summary: InsightSummary) -> Self {
        ToolOutput::Record(
            NamedValue::new("Journal entries today", Some(summary.entries_today)),
            vec![
                NamedValue::new("Latest mood score", summary.latest_score),
                NamedValue::new("Mood points this week", Some(summary.weekly_points)),
                NamedValue::new("Documents", Some(summary.documents)),
            ],
        )
    }
}

pub struct FetchUserInsightsTool {
    store: Option<Arc<dyn JournalStore>>,
    user_id: String,
    fetch_timeout: Option<Duration>,
}

impl FetchUserInsightsTool {
    pub fn new(
        store: Option<Arc<dyn JournalStore>>,
        user_id: impl Into<String>,
        fetch_timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            fetch_timeout,
        }
    }

    fn fetch(
        &self,
        store: Arc<dyn JournalStore>,
        query: JournalQuery,
    ) -> BoxFuture<'static, Result<Vec<JournalRow>, StoreError>> {
        let user_id = self.user_id.clone();
        let fetch = async move { store.fetch(&user_id, query).await };
        match self.fetch_timeout {
            Some(limit) => with_timeout(fetch, limit).boxed(),
            None => fetch.boxed(),
        }
    }
}

#[async_trait::async_trait]
impl ToolDefinition for FetchUserInsightsTool {
    type Params = FetchUserInsightsParams;

    const NAME: &'static str = "fetchUserInsights";

    const DESCRIPTION: &'static str = "Summarize the user's journal: today's entries, latest mood \
         score, this week's mood points and stored documents";

    async fn execute(&self, _params: FetchUserInsightsParams) -> Result<ToolOutput, ToolError> {
        let store = self
            .store
            .clone()
            .ok_or(ToolError::Unavailable("the journal store"))?;

        info!("Fetching insights for user {}", self.user_id);
        let fetches = JournalQuery::ALL.map(|query| self.fetch(store.clone(), query));
        let results = gather_all_or_fail(fetches).await?;

        let [entries, latest, weekly, documents]: [Vec<JournalRow>; 4] = results
            .try_into()
            .map_err(|_| ToolError::internal("insight reads returned an unexpected shape"))?;

        let summary = InsightSummary {
            entries_today: entries.len(),
            latest_score: latest.first().and_then(|row| row.score),
            weekly_points: weekly.len(),
            documents: documents.len(),
        };
        Ok(summary.into())
    }
}
