//! Watched stop configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stop whose monitors are polled.
///
/// Supplied by configuration and read-only to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchedStop {
    /// Stable identity used by downstream storage.
    pub id: Uuid,
    /// Stop identifier understood by the EFA backend (e.g. `de:08111:6008`).
    pub backend_stop_id: String,
    /// Display name.
    pub name: String,
    /// Free-form caller data, passed through untouched.
    #[serde(default)]
    pub note: String,
}

impl WatchedStop {
    /// Create a watched stop with an empty note.
    pub fn new(id: Uuid, backend_stop_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            backend_stop_id: backend_stop_id.into(),
            name: name.into(),
            note: String::new(),
        }
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_note() {
        let json = r#"{
            "id": "6f1c1f7e-2b1e-4f43-9d8e-2a7b5b0c3d11",
            "backend_stop_id": "de:08111:6008",
            "name": "Stuttgart Hbf"
        }"#;
        let stop: WatchedStop = serde_json::from_str(json).unwrap();
        assert_eq!(stop.backend_stop_id, "de:08111:6008");
        assert_eq!(stop.name, "Stuttgart Hbf");
        assert!(stop.note.is_empty());
    }

    #[test]
    fn builder_sets_note() {
        let stop = WatchedStop::new(Uuid::nil(), "de:08111:6008", "Stuttgart Hbf").with_note("S-Bahn");
        assert_eq!(stop.note, "S-Bahn");
        assert_eq!(stop.id, Uuid::nil());
    }
}
