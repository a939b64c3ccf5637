//! The transport seam used to retrieve SVG assets.
//!
//! The loader only needs an abstract "fetch this URL, give me text or a
//! failure" capability. [`SvgFetcher`] is that seam; [`HttpFetcher`] is the
//! conventional HTTP implementation (enabled by the default `http` feature),
//! and any closure of the right shape works too, which is what tests and
//! embedders with their own transports use.

use thiserror::Error;

/// Highest response status still treated as a successful fetch.
///
/// Anything above this (including redirect leftovers and all error
/// classes) is reported as [`FetchError::Status`].
pub const MAX_OK_STATUS: u16 = 203;

/// Error raised by a failed asset fetch.
///
/// Failures are diagnostics only: the loader logs them, notifies waiting
/// callbacks, and caches nothing. Cloneable so one failure can fan out to
/// every registered callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The transport answered with a status above [`MAX_OK_STATUS`].
    #[error("fetching {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The transport itself failed (connection, timeout, malformed body).
    #[error("transport error fetching {url}: {message}")]
    Transport { url: String, message: String },
}

/// A source of SVG text, addressed by URL.
///
/// Implementations run on a loader worker thread and may block; the
/// loader never invokes a fetcher for a URL that is cached or already
/// in flight.
pub trait SvgFetcher: Send + Sync {
    /// Retrieves the asset at `url` as text.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Any `Fn(&str) -> Result<String, FetchError>` closure is a fetcher.
impl<F> SvgFetcher for F
where
    F: Fn(&str) -> Result<String, FetchError> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self(url)
    }
}

/// HTTP GET fetcher backed by a [`ureq::Agent`].
///
/// Statuses are checked against [`MAX_OK_STATUS`] by this type rather
/// than being surfaced as transport errors.
#[cfg(feature = "http")]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Creates a fetcher with a 30 second global timeout.
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(std::time::Duration::from_secs(30)))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }

    /// Creates a fetcher from a preconfigured agent.
    ///
    /// The agent should be configured with `http_status_as_error(false)`
    /// so that status handling stays with this type.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

#[cfg(feature = "http")]
impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl SvgFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut response =
            self.agent
                .get(url)
                .call()
                .map_err(|e| FetchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        let status = response.status().as_u16();
        if status > MAX_OK_STATUS {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_fetchers() {
        let fetcher = |url: &str| -> Result<String, FetchError> {
            Ok(format!("<svg data-src=\"{url}\"/>"))
        };
        let content = fetcher.fetch("src/ios-heart.svg").unwrap();
        assert!(content.contains("src/ios-heart.svg"));
    }

    #[test]
    fn status_error_displays_url_and_code() {
        let err = FetchError::Status {
            url: "src/ios-heart.svg".into(),
            status: 404,
        };
        let text = err.to_string();
        assert!(text.contains("src/ios-heart.svg"));
        assert!(text.contains("404"));
    }
}
