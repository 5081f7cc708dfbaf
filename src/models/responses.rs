use serde::{Deserialize, Serialize};
use crate::models::domain::Profile;

/// Response of the like endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub is_match: bool,
    #[serde(default)]
    pub match_id: Option<i64>,
    #[serde(rename = "matched_user", default)]
    pub matched_profile: Option<Profile>,
    #[serde(default)]
    pub likes_count: Option<u32>,
    #[serde(default)]
    pub already_liked: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool { true }

/// Response of the dislike endpoint; only kept for logging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DislikeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub updated: bool,
}

/// Dating statistics for the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub matches_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_response_defaults() {
        let resp: LikeResponse = serde_json::from_str(r#"{"is_match": false}"#).unwrap();
        assert!(resp.success);
        assert!(!resp.is_match);
        assert!(resp.matched_profile.is_none());
        assert!(resp.likes_count.is_none());
    }

    #[test]
    fn test_like_response_with_match() {
        let json = r#"{
            "success": true,
            "is_match": true,
            "match_id": 12,
            "matched_user": {"id": 3, "name": "Dmitry"}
        }"#;
        let resp: LikeResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_match);
        assert_eq!(resp.match_id, Some(12));
        assert_eq!(resp.matched_profile.unwrap().name, "Dmitry");
    }

    #[test]
    fn test_stats_missing_fields() {
        let stats: StatsResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(stats, StatsResponse::default());
    }
}
