//! HTTP client for the class profile API.
//!
//! The client is an explicit object constructed with a base address and
//! timeout and injected where needed; there is no singleton. It hands
//! back fully materialized snapshots; all derived metrics come from the
//! analysis module afterwards.

use crate::models::{ClassProfile, StudentRecord};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Client for `GET /students` and `GET /class_profile`.
pub struct ProfileClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProfileClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full roster.
    pub async fn fetch_students(&self) -> Result<Vec<StudentRecord>> {
        let students: Vec<StudentRecord> = self.get_json("/students", &[]).await?;
        info!("Fetched {} students", students.len());
        Ok(students)
    }

    /// Fetch a single student by id. The API filters with `?id=` and
    /// returns a (possibly empty) array; the first match wins.
    pub async fn fetch_student(&self, id: &str) -> Result<Option<StudentRecord>> {
        let mut students: Vec<StudentRecord> = self.get_json("/students", &[("id", id)]).await?;
        Ok(if students.is_empty() {
            None
        } else {
            Some(students.swap_remove(0))
        })
    }

    /// Server-side name search with `?name_like=`. The list views filter
    /// client-side; this stays for callers that never hold a full roster.
    #[allow(dead_code)]
    pub async fn search_students(&self, query: &str) -> Result<Vec<StudentRecord>> {
        self.get_json("/students", &[("name_like", query)]).await
    }

    /// Fetch the class-wide curriculum coverage snapshot.
    pub async fn fetch_class_profile(&self) -> Result<ClassProfile> {
        self.get_json("/class_profile", &[]).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Request to {} timed out", url)
                } else if e.is_connect() {
                    anyhow::anyhow!("Cannot connect to class API at {}", self.base_url)
                } else {
                    anyhow::anyhow!("Failed to send request to {}: {}", url, e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Class API error {} on {}: {}", status, url, body));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ProfileClient::new("http://localhost:3000/", 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.endpoint("/students"), "http://localhost:3000/students");
    }

    #[test]
    fn test_endpoint_joining() {
        let client = ProfileClient::new("http://172.20.10.9:3000", 30).unwrap();
        assert_eq!(
            client.endpoint("/class_profile"),
            "http://172.20.10.9:3000/class_profile"
        );
    }
}
