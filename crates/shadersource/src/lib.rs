//! Shader source locator resolution.
//!
//! The renderer accepts its vertex and fragment inputs as plain strings. When
//! a string turns out not to be compilable GLSL, it is reinterpreted as a
//! *locator* and resolved here: `http(s)://` locators are fetched as plain
//! text over a blocking HTTP client, anything else is treated as a filesystem
//! path and read as UTF-8. Resolution is best-effort and performed at most
//! once per program build; retry policy lives with the caller.

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

/// Failures raised while turning a locator into shader text.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("shader locator must not be empty")]
    EmptyLocator,
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("invalid shader url '{locator}': {reason}")]
    InvalidUrl { locator: String, reason: String },
    #[error("failed to fetch shader from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to read shader file {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Returns true when the locator names a remote resource.
pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Fetches shader text over HTTP with a reusable blocking client.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: Client,
}

impl SourceFetcher {
    pub fn new() -> Result<Self, SourceError> {
        let http = Client::builder().build().map_err(SourceError::Client)?;
        Ok(Self { http })
    }

    /// Downloads the locator body as plain text.
    pub fn fetch_text(&self, locator: &str) -> Result<String, SourceError> {
        let url = Url::parse(locator).map_err(|err| SourceError::InvalidUrl {
            locator: locator.to_string(),
            reason: err.to_string(),
        })?;
        debug!(%url, "fetching shader source");
        let response = self
            .http
            .get(url.clone())
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| SourceError::Fetch {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        response.text().map_err(|err| SourceError::Fetch {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }

    /// Resolves a locator to shader text: remote locators are fetched, local
    /// ones read from disk.
    pub fn resolve(&self, locator: &str) -> Result<String, SourceError> {
        let trimmed = locator.trim();
        if trimmed.is_empty() {
            return Err(SourceError::EmptyLocator);
        }
        if is_remote(trimmed) {
            return self.fetch_text(trimmed);
        }
        read_file(Path::new(trimmed))
    }
}

/// Reads a local shader file as UTF-8 text.
pub fn read_file(path: &Path) -> Result<String, SourceError> {
    debug!(path = %path.display(), "reading shader source");
    fs::read_to_string(path).map_err(|err| SourceError::Read {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn classifies_remote_locators() {
        assert!(is_remote("https://example.com/image.frag"));
        assert!(is_remote("http://example.com/image.vert"));
        assert!(!is_remote("shaders/image.frag"));
        assert!(!is_remote("/absolute/image.vert"));
    }

    #[test]
    fn empty_locator_is_an_error() {
        let fetcher = SourceFetcher::new().unwrap();
        assert!(matches!(
            fetcher.resolve("   "),
            Err(SourceError::EmptyLocator)
        ));
    }

    #[test]
    fn resolves_local_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "void main() {{}}").unwrap();
        let fetcher = SourceFetcher::new().unwrap();
        let text = fetcher.resolve(file.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "void main() {}");
    }

    #[test]
    fn missing_file_reports_path() {
        let fetcher = SourceFetcher::new().unwrap();
        let err = fetcher.resolve("/definitely/not/here.frag").unwrap_err();
        match err {
            SourceError::Read { path, .. } => assert!(path.contains("here.frag")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
