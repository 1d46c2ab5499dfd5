// Futures are not Send; everything runs on the page's event loop.

mod http;

pub use http::HttpRegionApi;

use crate::error::ViewerResult;
use crate::model::{Region, RegionId, SearchResult, SubRegion, SubRegionSummary};
use std::future::Future;

pub trait RegionApi {
    /// `GET /aimags`
    fn regions(&self) -> impl Future<Output = ViewerResult<Vec<Region>>>;

    /// `GET /sums`
    fn sub_regions(&self) -> impl Future<Output = ViewerResult<Vec<SubRegion>>>;

    /// `GET /aimags/{id}/sums`
    fn region_sub_regions(
        &self,
        region_id: RegionId,
    ) -> impl Future<Output = ViewerResult<Vec<SubRegionSummary>>>;

    /// `GET /sums/{id}`
    fn sub_region(&self, id: RegionId) -> impl Future<Output = ViewerResult<SubRegion>>;

    /// `GET /search?q=`
    fn search(&self, query: &str) -> impl Future<Output = ViewerResult<Vec<SearchResult>>>;

    /// `GET /health`, returns the reported status string.
    fn health(&self) -> impl Future<Output = ViewerResult<String>>;
}
