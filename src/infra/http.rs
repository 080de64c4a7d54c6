use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use tracing::{info, warn};

use super::Source;
use crate::config::Config;
use crate::error::PipelineError;

#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    user_agent: String,
    timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
}

impl HttpSource {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.source_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            max_attempts: config.max_attempts,
            backoff: config.backoff,
        }
    }

    fn fetch_once(&self, client: &Client) -> Result<String> {
        let response = client
            .get(&self.url)
            .send()
            .context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {status}");
        }

        let body = response.text().context("failed to read response body")?;
        if body.trim().is_empty() {
            bail!("empty response body");
        }
        Ok(body)
    }
}

impl Source for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, PipelineError> {
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(|e| PipelineError::Fetch {
                url: self.url.clone(),
                msg: e.to_string(),
            })?;

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.fetch_once(&client) {
                Ok(body) => {
                    info!("Downloaded {} bytes from {}", body.len(), self.url);
                    return Ok(body);
                }
                Err(e) => {
                    warn!(
                        "Fetch attempt {}/{} for {} failed: {:#}",
                        attempt, self.max_attempts, self.url, e
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        thread::sleep(self.backoff);
                    }
                }
            }
        }

        Err(PipelineError::Fetch {
            url: self.url.clone(),
            msg: last_error
                .map(|e| format!("{e:#}"))
                .unwrap_or_else(|| "no attempts made".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn source(url: String, max_attempts: u32) -> HttpSource {
        HttpSource {
            url,
            user_agent: "christmas-episodes-test".to_string(),
            timeout: Duration::from_secs(5),
            max_attempts,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_fetch_returns_body_and_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/wiki/List")
                .header("user-agent", "christmas-episodes-test");
            then.status(200).body("<html>ok</html>");
        });

        let body = source(server.url("/wiki/List"), 3).fetch().unwrap();
        assert_eq!(body, "<html>ok</html>");
        mock.assert_hits(1);
    }

    #[test]
    fn test_fetch_retries_up_to_max_attempts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/wiki/List");
            then.status(503);
        });

        let err = source(server.url("/wiki/List"), 3).fetch().unwrap_err();
        mock.assert_hits(3);
        match err {
            PipelineError::Fetch { msg, .. } => assert!(msg.contains("503")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_found_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let err = source(server.url("/missing"), 1).fetch().unwrap_err();
        assert!(matches!(err, PipelineError::Fetch { .. }));
    }

    #[test]
    fn test_empty_body_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(200).body("  ");
        });

        let err = source(server.url("/empty"), 1).fetch().unwrap_err();
        assert!(err.to_string().contains("empty response body"));
    }
}
