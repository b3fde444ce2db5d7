//! Snapshot codec
//!
//! Versioned JSON document used by the durable backends:
//! `{"version": 1, "serial": N, "modules": [{"path": [...], "outputs": {...}}]}`.

use super::{ModuleState, StateSnapshot};
use crate::error::StateError;
use crate::types::Serial;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Current document format version
pub const STATE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StateDocumentRef<'a> {
    version: u32,
    serial: Serial,
    modules: &'a [ModuleState],
}

#[derive(Deserialize)]
struct StateDocument {
    version: u32,
    #[serde(default)]
    serial: Serial,
    #[serde(default)]
    modules: Vec<ModuleState>,
}

/// Encode a snapshot into a byte buffer.
pub fn encode(state: &StateSnapshot) -> Result<Vec<u8>, StateError> {
    let mut buf = Vec::new();
    write_state(state, &mut buf)?;
    Ok(buf)
}

/// Decode a snapshot from bytes, validating format version and module paths.
pub fn decode(bytes: &[u8]) -> Result<StateSnapshot, StateError> {
    read_state(bytes)
}

pub fn write_state<W: Write>(state: &StateSnapshot, mut writer: W) -> Result<(), StateError> {
    let document = StateDocumentRef {
        version: STATE_FORMAT_VERSION,
        serial: state.serial,
        modules: &state.modules,
    };
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|e| StateError::Codec(format!("Failed to encode state: {}", e)))?;
    writer.write_all(b"\n")?;
    Ok(())
}

pub fn read_state<R: Read>(reader: R) -> Result<StateSnapshot, StateError> {
    let document: StateDocument = serde_json::from_reader(reader)
        .map_err(|e| StateError::Codec(format!("Failed to decode state: {}", e)))?;

    if document.version != STATE_FORMAT_VERSION {
        return Err(StateError::Codec(format!(
            "Unsupported state format version {} (expected {})",
            document.version, STATE_FORMAT_VERSION
        )));
    }

    let state = StateSnapshot {
        serial: document.serial,
        modules: document.modules,
    };
    state.validate()?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::module_path;

    #[test]
    fn test_encode_layout() {
        let mut state = StateSnapshot::new();
        state.serial = 3;
        state.add_module(ModuleState::new(module_path(&["root"])).with_output("bar", "baz"));

        let bytes = encode(&state).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["serial"], 3);
        assert_eq!(value["modules"][0]["path"][0], "root");
        assert_eq!(value["modules"][0]["outputs"]["bar"], "baz");

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let err = decode(br#"{"version": 9, "serial": 1, "modules": []}"#).unwrap_err();
        assert!(matches!(err, StateError::Codec(_)));
        assert!(err.to_string().contains("version 9"));
    }

    #[test]
    fn test_decode_rejects_duplicate_paths() {
        let raw = br#"{"version": 1, "modules": [{"path": ["a"]}, {"path": ["a"]}]}"#;
        let err = decode(raw).unwrap_err();
        assert!(matches!(err, StateError::InvalidState(_)));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode(b"not json").unwrap_err();
        assert!(matches!(err, StateError::Codec(_)));
    }
}
