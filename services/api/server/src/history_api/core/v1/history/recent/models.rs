use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query-string parameters for reading the history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    /// Maximum number of entries to return. Carried as a raw string so a
    /// non-numeric value can be rejected with a structured error instead
    /// of an extractor rejection.
    pub limit: Option<String>,
}

/// A single recorded search
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchHistoryEntry {
    pub id: i64,
    #[schema(example = "cats")]
    pub query: String,
    #[schema(example = "2025-07-12T09:10:11Z")]
    pub search_time: Option<chrono::DateTime<chrono::Utc>>,
    pub results_count: Option<i32>,
}

/// Response containing the most recent searches, newest first
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<SearchHistoryEntry>,
}
