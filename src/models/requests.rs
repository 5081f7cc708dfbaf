use serde::{Deserialize, Serialize};
use validator::Validate;

/// Paginated list query used by the feed and liked-me endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    pub offset: u32,
}

impl PageQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Query string fragment, e.g. `limit=10&offset=20`
    pub fn to_query_string(&self) -> String {
        format!("limit={}&offset={}", self.limit, self.offset)
    }
}
