//! Pagination extractor.

use serde::Deserialize;
use utoipa::IntoParams;
use waypoint_core::PageRequest;

/// Query parameters for pagination.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Zero-based page number.
    #[serde(default)]
    pub page: Option<usize>,
    /// Page size, capped at 100.
    #[serde(default)]
    pub size: Option<usize>,
}

impl From<PaginationQuery> for PageRequest {
    fn from(query: PaginationQuery) -> Self {
        PageRequest::new(query.page.unwrap_or(0), query.size.unwrap_or(PageRequest::DEFAULT_SIZE))
    }
}
