use serde::Deserialize;
use uuid::Uuid;

use crate::database::{Collection, Page};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Pagination (optional)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn page(&self, max_page_size: i64) -> Page {
        Page::clamped(self.limit, self.offset, max_page_size)
    }
}

/// Unknown collections are a 404, same as a missing route
pub fn parse_collection(name: &str) -> Result<Collection, ApiError> {
    name.parse::<Collection>().map_err(ApiError::from)
}

/// Ids are opaque to clients: anything that is not one of ours is simply not found
pub fn parse_id(collection: Collection, id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| not_found(collection, id))
}

pub fn not_found(collection: Collection, id: &str) -> ApiError {
    ApiError::not_found(format!("Document {} not found in {}", id, collection))
}
