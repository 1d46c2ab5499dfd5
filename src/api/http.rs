use super::RegionApi;
use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::model::{Region, RegionId, SearchResult, SubRegion, SubRegionSummary};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Backend client over `reqwest`; uses the browser's `fetch` on wasm.
#[derive(Clone, Debug)]
pub struct HttpRegionApi {
    client: reqwest::Client,
    base: String,
    health_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

impl HttpRegionApi {
    pub fn new(config: &ViewerConfig) -> Self {
        HttpRegionApi {
            client: reqwest::Client::new(),
            base: config.api_root().to_string(),
            health_url: config.health_endpoint(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    fn get_request(&self, url: &str, query: &[(&str, &str)]) -> ViewerResult<reqwest::Request> {
        let mut builder = self.client.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder.build()?)
    }

    /// `q` goes through the form encoder, so `&`, spaces and Cyrillic stay
    /// inside the one parameter.
    fn search_request(&self, query: &str) -> ViewerResult<reqwest::Request> {
        self.get_request(&self.endpoint("search"), &[("q", query)])
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::Request) -> ViewerResult<T> {
        tracing::debug!(url = %request.url(), "GET");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(backend_error(status.as_u16(), &body));
        }
        decode_body(&body)
    }

    async fn get_path<T: DeserializeOwned>(&self, path: &str) -> ViewerResult<T> {
        self.get_json(self.get_request(&self.endpoint(path), &[])?).await
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> ViewerResult<T> {
    serde_json::from_str(body).map_err(|e| ViewerError::Decode(format!("Invalid response: {}", e)))
}

/// The backend reports failures as `{"error": "..."}`; anything else is kept
/// verbatim.
pub(crate) fn backend_error(status: u16, body: &str) -> ViewerError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    };
    ViewerError::Backend { status, message }
}

impl RegionApi for HttpRegionApi {
    async fn regions(&self) -> ViewerResult<Vec<Region>> {
        self.get_path("aimags").await
    }

    async fn sub_regions(&self) -> ViewerResult<Vec<SubRegion>> {
        self.get_path("sums").await
    }

    async fn region_sub_regions(&self, region_id: RegionId) -> ViewerResult<Vec<SubRegionSummary>> {
        self.get_path(&format!("aimags/{}/sums", region_id)).await
    }

    async fn sub_region(&self, id: RegionId) -> ViewerResult<SubRegion> {
        self.get_path(&format!("sums/{}", id)).await
    }

    async fn search(&self, query: &str) -> ViewerResult<Vec<SearchResult>> {
        self.get_json(self.search_request(query)?).await
    }

    async fn health(&self) -> ViewerResult<String> {
        let body: HealthBody = self.get_json(self.get_request(&self.health_url, &[])?).await?;
        Ok(body.status)
    }
}
