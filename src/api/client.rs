//! Results API Client
//!
//! A reqwest client for the read endpoints under `/api`.

use crate::api::ElectionApi;
use crate::api::error::ApiError;
use crate::api::types::{
    Candidate, CandidatesResponse, ComparisonResponse, ComparisonRow, CountingSpeed,
    ExportFormat, PartiesResponse, Party, Predictions, Progress, Region, RegionsResponse,
    ResultsResponse, TimeSeriesResponse,
};
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with dashboard version
const USER_AGENT: &str = concat!("volby-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
}

impl ApiClient {
    pub fn new(environment: Environment) -> Result<Self, ApiError> {
        let base_url = environment.api_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    /// Joins the endpoint onto the base URL and appends URL-encoded query pairs.
    fn build_url(&self, endpoint: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Response, ApiError> {
        let url = self.build_url(endpoint, query);
        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::handle_response_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.get_request(endpoint, query).await?;
        let response_bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&response_bytes)?)
    }
}

#[async_trait::async_trait]
impl ElectionApi for ApiClient {
    async fn regions(&self) -> Result<Vec<Region>, ApiError> {
        let response: RegionsResponse = self.get_json("api/regions", &[]).await?;
        Ok(response.regions)
    }

    async fn parties(&self) -> Result<Vec<Party>, ApiError> {
        let response: PartiesResponse = self.get_json("api/parties", &[]).await?;
        Ok(response.parties)
    }

    async fn current_results(&self, region: &str) -> Result<ResultsResponse, ApiError> {
        self.get_json("api/current_results", &[("region", region)])
            .await
    }

    async fn progress(&self, region: &str) -> Result<Progress, ApiError> {
        self.get_json("api/progress", &[("region", region)]).await
    }

    async fn predictions(&self, region: &str) -> Result<Predictions, ApiError> {
        self.get_json("api/predictions", &[("region", region)]).await
    }

    async fn counting_speed(&self, region: &str) -> Result<CountingSpeed, ApiError> {
        self.get_json("api/counting_speed", &[("region", region)])
            .await
    }

    async fn time_series(
        &self,
        region: &str,
        hours: u32,
    ) -> Result<TimeSeriesResponse, ApiError> {
        let hours = hours.to_string();
        self.get_json("api/time_series", &[("region", region), ("hours", &hours)])
            .await
    }

    async fn comparison(&self, regions: Vec<String>) -> Result<Vec<ComparisonRow>, ApiError> {
        let regions = regions.join(",");
        let response: ComparisonResponse = self
            .get_json("api/comparison", &[("regions", &regions)])
            .await?;
        Ok(response.comparison)
    }

    async fn candidates(
        &self,
        region: &str,
        party: Option<String>,
        limit: u32,
    ) -> Result<Vec<Candidate>, ApiError> {
        let limit = limit.to_string();
        let mut query = vec![("region", region), ("limit", limit.as_str())];
        if let Some(party) = party.as_deref().filter(|p| !p.is_empty()) {
            query.push(("party", party));
        }
        let response: CandidatesResponse = self.get_json("api/candidates", &query).await?;
        Ok(response.candidates)
    }

    async fn export(&self, region: &str, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        let endpoint = format!("api/export/{}", format);
        let response = self.get_request(&endpoint, &[("region", region)]).await?;
        Ok(response.bytes().await?.to_vec())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the request line it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}", addr), handle)
    }

    fn client_for(base_url: String) -> ApiClient {
        ApiClient::new(Environment::Custom { base_url }).unwrap()
    }

    #[test]
    fn test_build_url_encodes_query_values() {
        let client = client_for("http://localhost:8080/".to_string());
        let url = client.build_url("/api/comparison", &[("regions", "CZ,CZ010")]);
        assert_eq!(url, "http://localhost:8080/api/comparison?regions=CZ%2CCZ010");

        let url = client.build_url("api/time_series", &[("region", "CZ"), ("hours", "168")]);
        assert_eq!(url, "http://localhost:8080/api/time_series?region=CZ&hours=168");
    }

    #[tokio::test]
    async fn test_time_series_request_and_decode() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"region": {"code": "CZ", "name": "Česko"},
                "time_series": [{"timestamp": "2025-10-04T14:05:00", "new_votes": 100}]}"#,
        )
        .await;
        let client = client_for(base_url);

        let response = client.time_series("CZ", 6).await.unwrap();
        assert_eq!(response.time_series.len(), 1);
        assert_eq!(response.time_series[0].new_votes, Some(100));

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/time_series?region=CZ&hours=6 "));
    }

    #[tokio::test]
    async fn test_candidates_omits_empty_party_filter() {
        let (base_url, server) = serve_once("200 OK", r#"{"candidates": []}"#).await;
        let client = client_for(base_url);

        let candidates = client
            .candidates("CZ010", Some(String::new()), 20)
            .await
            .unwrap();
        assert!(candidates.is_empty());

        let request_line = server.await.unwrap();
        assert!(request_line.contains("region=CZ010&limit=20"));
        assert!(!request_line.contains("party="));
    }

    #[tokio::test]
    async fn test_http_error_carries_status() {
        let (base_url, server) =
            serve_once("404 Not Found", r#"{"error": "Region not found"}"#).await;
        let client = client_for(base_url);

        let err = client.progress("XX").await.unwrap_err();
        assert!(err.is_not_found());
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("Region not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }
}
