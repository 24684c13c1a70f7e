//! HTTP client for the key-value service.

use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Request timed out")]
    Timeout,
    #[error("Request failed: {0}")]
    Request(reqwest::Error),
    #[error("Server returned status {0}")]
    Status(u16),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout
        } else if e.is_decode() {
            SyncError::Decode(e.to_string())
        } else {
            SyncError::Request(e)
        }
    }
}

/// Every request is abandoned once `timeout` elapses.
#[derive(Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: Url,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let base_url = Url::parse(base_url).map_err(|e| SyncError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The key always lands in a single percent-encoded path segment.
    fn url(&self, key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(key);
        }
        url
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SyncError::Status(status.as_u16()))
        }
    }

    /// Absent keys come back as `Value::Null`.
    pub async fn get(&self, key: &str) -> Result<Value, SyncError> {
        let response = self.client.get(self.url(key)).send().await?;
        let value = Self::check(response)?.json::<Value>().await?;
        Ok(value)
    }

    pub async fn put(&self, key: &str, value: &Value) -> Result<(), SyncError> {
        let response = self.client.post(self.url(key)).json(value).send().await?;
        Self::check(response)?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), SyncError> {
        let response = self.client.delete(self.url(key)).send().await?;
        Self::check(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(base: &str) -> RemoteStore {
        RemoteStore::new(base, Duration::from_millis(50)).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        for base in ["http://localhost:3000/api/data/", "http://localhost:3000/api/data"] {
            assert_eq!(
                remote(base).url("kanban_projects").as_str(),
                "http://localhost:3000/api/data/kanban_projects"
            );
        }
    }

    #[test]
    fn test_reserved_characters_stay_inside_the_key_segment() {
        let remote = remote("http://localhost:3000/api/data");

        let url = remote.url("tasks_a#b?c/d");
        assert_eq!(url.as_str(), "http://localhost:3000/api/data/tasks_a%23b%3Fc%2Fd");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            RemoteStore::new("not a url", Duration::from_millis(50)),
            Err(SyncError::InvalidUrl(_))
        ));
        assert!(matches!(
            RemoteStore::new("mailto:someone@example.com", Duration::from_millis(50)),
            Err(SyncError::InvalidUrl(_))
        ));
    }
}
