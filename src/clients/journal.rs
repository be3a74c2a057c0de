//! Journal data store client.
//!
//! The store is a relational database fronted by a PostgREST-style API. Every
//! read is scoped to one user and, where relevant, a time window.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::StoreError;

/// Length of the "weekly" window.
pub const WEEK_DAYS: i64 = 7;

/// The read queries the store supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalQuery {
    /// Journal entries written since midnight (UTC).
    EntriesToday,
    /// The most recent mood score, if any.
    LatestScore,
    /// Mood scores recorded over the last seven days.
    WeeklyScores,
    /// Documents the user has uploaded.
    Documents,
}

impl JournalQuery {
    pub const ALL: [JournalQuery; 4] = [
        JournalQuery::EntriesToday,
        JournalQuery::LatestScore,
        JournalQuery::WeeklyScores,
        JournalQuery::Documents,
    ];

    /// Table the query reads from.
    pub fn table(self) -> &'static str {
        match self {
            Self::EntriesToday => "journal_entries",
            Self::LatestScore | Self::WeeklyScores => "mood_scores",
            Self::Documents => "documents",
        }
    }

    /// PostgREST query parameters for this query, relative to `now`.
    pub fn params(self, user_id: &str, now: DateTime<Utc>) -> Vec<(String, String)> {
        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            ("user_id".to_string(), format!("eq.{}", user_id)),
        ];

        match self {
            Self::EntriesToday => {
                params.push(("created_at".to_string(), format!("gte.{}", timestamp(start_of_day(now)))));
                params.push(("order".to_string(), "created_at.asc".to_string()));
            }
            Self::LatestScore => {
                params.push(("order".to_string(), "created_at.desc".to_string()));
                params.push(("limit".to_string(), "1".to_string()));
            }
            Self::WeeklyScores => {
                let since = now - Duration::days(WEEK_DAYS);
                params.push(("created_at".to_string(), format!("gte.{}", timestamp(since))));
                params.push(("order".to_string(), "created_at.asc".to_string()));
            }
            Self::Documents => {
                params.push(("order".to_string(), "created_at.desc".to_string()));
            }
        }

        params
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A row returned by the store. Only the columns the tools read are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalRow {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Read access to the journal store.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Run one read query for a user. Rows are ordered as the query specifies.
    async fn fetch(&self, user_id: &str, query: JournalQuery) -> Result<Vec<JournalRow>, StoreError>;
}

/// REST client for a PostgREST-compatible store (`GET {base}/rest/v1/{table}`).
pub struct RestJournalStore {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl RestJournalStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl JournalStore for RestJournalStore {
    #[instrument(skip(self))]
    async fn fetch(&self, user_id: &str, query: JournalQuery) -> Result<Vec<JournalRow>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, query.table());
        let response = self
            .http_client
            .get(url)
            .query(&query.params(user_id, Utc::now()))
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<JournalRow> = response.json().await?;
        debug!("{:?} returned {} row(s)", query, rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap()
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_entries_today_window() {
        let params = JournalQuery::EntriesToday.params("user-1", now());
        assert_eq!(param(&params, "user_id"), Some("eq.user-1"));
        assert_eq!(param(&params, "created_at"), Some("gte.2024-03-14T00:00:00Z"));
    }

    #[test]
    fn test_weekly_window() {
        let params = JournalQuery::WeeklyScores.params("user-1", now());
        assert_eq!(param(&params, "created_at"), Some("gte.2024-03-07T15:09:26Z"));
    }

    #[test]
    fn test_latest_score_is_limited() {
        let params = JournalQuery::LatestScore.params("user-1", now());
        assert_eq!(param(&params, "order"), Some("created_at.desc"));
        assert_eq!(param(&params, "limit"), Some("1"));
        assert_eq!(param(&params, "created_at"), None);
    }

    #[test]
    fn test_tables() {
        assert_eq!(JournalQuery::EntriesToday.table(), "journal_entries");
        assert_eq!(JournalQuery::LatestScore.table(), "mood_scores");
        assert_eq!(JournalQuery::WeeklyScores.table(), "mood_scores");
        assert_eq!(JournalQuery::Documents.table(), "documents");
    }

    #[test]
    fn test_row_tolerates_extra_columns() {
        let json = r#"[{"id": 5, "score": 7.5, "created_at": "2024-03-14T10:00:00+00:00", "note": "x"}]"#;
        let rows: Vec<JournalRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].score, Some(7.5));
    }
}
