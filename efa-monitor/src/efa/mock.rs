//! Mock transport for running without network access.
//!
//! Serves canned XML responses, either registered in code or loaded from a
//! directory of fixture files, as if they came from the EFA server.

use std::collections::HashMap;
use std::path::Path;

use super::client::Transport;
use super::error::EfaError;
use super::tree::Document;
use super::url::Mode;

/// Transport that answers from canned responses.
///
/// Responses are keyed by mode and backend stop id; the rest of the URL is
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: HashMap<(Mode, String), String>,
}

impl MockTransport {
    /// Create a transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response.
    pub fn with_response(
        mut self,
        mode: Mode,
        backend_stop_id: &str,
        xml: impl Into<String>,
    ) -> Self {
        self.responses
            .insert((mode, file_key(backend_stop_id)), xml.into());
        self
    }

    /// Load responses from a directory.
    ///
    /// Expects files named `{dep|arr}_{backend stop id}.xml`, with the colons
    /// of the stop id replaced by underscores (e.g. `dep_de_08111_2599.xml`).
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, EfaError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            EfaError::Fixture(format!("failed to read {}: {}", data_dir.display(), e))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| EfaError::Fixture(format!("failed to read directory entry: {}", e)))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("xml") {
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let Some((mode, key)) = stem
                .split_once('_')
                .and_then(|(mode, key)| Some((Mode::from_param(mode)?, key)))
            else {
                return Err(EfaError::Fixture(format!(
                    "invalid fixture name: {}",
                    path.display()
                )));
            };

            let xml = std::fs::read_to_string(&path).map_err(|e| {
                EfaError::Fixture(format!("failed to read {}: {}", path.display(), e))
            })?;

            responses.insert((mode, key.to_string()), xml);
        }

        if responses.is_empty() {
            return Err(EfaError::Fixture(format!(
                "no fixture files found in {}",
                data_dir.display()
            )));
        }

        Ok(Self { responses })
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    fn lookup(&self, url: &str) -> Result<&str, EfaError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| EfaError::Fixture(format!("invalid URL {url}: {e}")))?;

        let mut stop = None;
        let mut mode = None;
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "name_dm" => stop = Some(value.into_owned()),
                "itdDateTimeDepArr" => mode = Mode::from_param(&value),
                _ => {}
            }
        }

        let (Some(stop), Some(mode)) = (stop, mode) else {
            return Err(EfaError::Fixture(format!("not a monitor request: {url}")));
        };

        self.responses
            .get(&(mode, file_key(&stop)))
            .map(String::as_str)
            .ok_or_else(|| {
                EfaError::Fixture(format!(
                    "no mock {} response for stop {}",
                    mode.as_param(),
                    stop
                ))
            })
    }
}

fn file_key(backend_stop_id: &str) -> String {
    backend_stop_id.replace(':', "_")
}

impl Transport for MockTransport {
    async fn open(&self, url: &str) -> Result<Document, EfaError> {
        let xml = self.lookup(url)?;
        Ok(Document::parse(xml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efa::{DEFAULT_BASE_URL, departure_monitor_from_response};

    const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/mock_efa");

    fn url(stop: &str, mode: &str) -> String {
        format!("{DEFAULT_BASE_URL}?language=de&name_dm={stop}&itdDateTimeDepArr={mode}")
    }

    #[test]
    fn load_mock_data() {
        let transport = MockTransport::from_dir(DATA_DIR).unwrap();
        assert!(transport.len() >= 2);
    }

    #[tokio::test]
    async fn serves_fixture_by_stop_and_mode() {
        let transport = MockTransport::from_dir(DATA_DIR).unwrap();

        let doc = transport.open(&url("de:08111:6008", "dep")).await.unwrap();
        let monitor = departure_monitor_from_response(doc.root()).unwrap();
        assert_eq!(monitor.stop_gid, "de:08111:6008");
        assert!(!monitor.is_empty());
    }

    #[tokio::test]
    async fn unknown_stop_returns_error() {
        let transport = MockTransport::from_dir(DATA_DIR).unwrap();
        let result = transport.open(&url("de:00000:1", "dep")).await;
        assert!(matches!(result, Err(EfaError::Fixture(_))));
    }

    #[tokio::test]
    async fn non_monitor_url_returns_error() {
        let transport = MockTransport::new().with_response(Mode::Departures, "x", "<a/>");
        let result = transport.open("https://example.org/").await;
        assert!(matches!(result, Err(EfaError::Fixture(_))));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MockTransport::from_dir(dir.path()).is_err());
    }

    #[test]
    fn badly_named_fixture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("departures.xml"), "<a/>").unwrap();
        assert!(MockTransport::from_dir(dir.path()).is_err());
    }

    #[test]
    fn ignores_non_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), "fixtures").unwrap();
        std::fs::write(dir.path().join("arr_de_1_2.xml"), "<a/>").unwrap();
        let transport = MockTransport::from_dir(dir.path()).unwrap();
        assert_eq!(transport.len(), 1);
    }
}
