// src/infrastructure/http.rs
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::redirect;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::health::{HealthStatus, ProbeResult};
use crate::domain::services::link_prober::LinkProber;

const WEB_ARCHIVE_API: &str = "https://web.archive.org/wayback/available";

/// HEAD-probing `LinkProber` over a blocking reqwest client with bounded
/// timeout and redirect count. All failures classify as broken; nothing here
/// ever blocks past the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpLinkProber {
    client: Client,
    archive_client: Client,
}

impl HttpLinkProber {
    pub fn new(timeout_secs: u64, max_redirects: usize, user_agent: &str) -> Self {
        let timeout = Duration::from_secs(timeout_secs);

        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(max_redirects))
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new()); // Fallback to default client in case of builder failure

        // Archive lookups never follow more than the API's own redirect.
        let archive_client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            archive_client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveAvailability {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Deserialize, Default)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ClosestSnapshot {
    #[serde(default)]
    available: bool,
    url: String,
}

impl LinkProber for HttpLinkProber {
    #[instrument(skip(self), level = "debug")]
    fn probe(&self, url: &str) -> ProbeResult {
        let start = Instant::now();

        match self.client.head(url).send() {
            Ok(response) => {
                let response_time_ms = start.elapsed().as_millis() as i32;
                let status_code = response.status().as_u16() as i32;
                let final_url = response.url().to_string();
                let redirected = final_url != url;

                let (status, error) = if status_code >= 400 {
                    (HealthStatus::Broken, Some(format!("HTTP {}", status_code)))
                } else if redirected {
                    (HealthStatus::Redirected, None)
                } else {
                    (HealthStatus::Ok, None)
                };

                ProbeResult {
                    status,
                    status_code: Some(status_code),
                    final_url: Some(final_url),
                    response_time_ms: Some(response_time_ms),
                    error,
                }
            }
            Err(e) => ProbeResult {
                status: HealthStatus::Broken,
                status_code: None,
                final_url: None,
                response_time_ms: Some(start.elapsed().as_millis() as i32),
                error: Some(e.to_string()),
            },
        }
    }

    #[instrument(skip(self), level = "debug")]
    fn find_archive_snapshot(&self, url: &str) -> Option<String> {
        let endpoint = Url::parse_with_params(WEB_ARCHIVE_API, &[("url", url)]).ok()?;

        let response = self.archive_client.get(endpoint).send().ok()?;
        if !response.status().is_success() {
            debug!("Archive availability lookup returned {}", response.status());
            return None;
        }

        let availability: ArchiveAvailability = response.json().ok()?;
        availability
            .archived_snapshots
            .closest
            .filter(|snapshot| snapshot.available)
            .map(|snapshot| snapshot.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_available_snapshot_payload_when_deserialize_then_url_extracted() {
        let payload = r#"{
            "url": "https://example.com/gone",
            "archived_snapshots": {
                "closest": {
                    "status": "200",
                    "available": true,
                    "url": "http://web.archive.org/web/20240101000000/https://example.com/gone",
                    "timestamp": "20240101000000"
                }
            }
        }"#;

        let availability: ArchiveAvailability = serde_json::from_str(payload).unwrap();
        let snapshot = availability
            .archived_snapshots
            .closest
            .filter(|s| s.available)
            .map(|s| s.url);
        assert_eq!(
            snapshot.as_deref(),
            Some("http://web.archive.org/web/20240101000000/https://example.com/gone")
        );
    }

    #[test]
    fn given_no_snapshot_payload_when_deserialize_then_none() {
        let payload = r#"{"url": "https://example.com/gone", "archived_snapshots": {}}"#;

        let availability: ArchiveAvailability = serde_json::from_str(payload).unwrap();
        assert!(availability.archived_snapshots.closest.is_none());
    }

    #[test]
    fn given_url_with_query_when_build_endpoint_then_encoded() {
        let endpoint =
            Url::parse_with_params(WEB_ARCHIVE_API, &[("url", "https://example.com/p?a=1&b=2")])
                .unwrap();
        assert!(endpoint.as_str().starts_with(WEB_ARCHIVE_API));
        assert_eq!(
            endpoint.query_pairs().next().map(|(_, v)| v.into_owned()),
            Some("https://example.com/p?a=1&b=2".to_string())
        );
    }
}
