use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for recording a search
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecordSearchRequest {
    /// Raw search string as submitted by the client. Optional; an absent
    /// field is stored as the empty string.
    #[serde(default)]
    #[schema(example = "cats")]
    pub query: String,
}

/// Response for a recorded search
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordSearchResponse {
    pub success: bool,
    #[schema(example = "Search saved")]
    pub message: String,
}
