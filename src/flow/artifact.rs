use super::definition::FlowValue;
use crate::error::ArtifactError;
use crate::traverse::{TraversalOrder, flatten_order};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A migrated flow document together with its precomputed traversal orders,
/// in a form that can be persisted and reloaded without re-running migration.
///
/// The document itself is stored as canonical JSON bytes inside the bincode
/// envelope: input transforms embed free-form JSON literals, which the
/// non-self-describing bincode format cannot round-trip directly.
#[derive(Serialize, Deserialize, Debug)]
pub struct FlowArtifact {
    flow_json: Vec<u8>,
    pub preview_order: Vec<String>,
    pub completion_order: Vec<String>,
}

impl FlowArtifact {
    pub fn new(flow: &FlowValue) -> Result<Self, ArtifactError> {
        let flow_json = serde_json::to_vec(flow)
            .map_err(|e| ArtifactError::Generic(format!("Serialization failed: {}", e)))?;
        Ok(Self {
            flow_json,
            preview_order: flatten_order(&flow.modules, TraversalOrder::Preview),
            completion_order: flatten_order(&flow.modules, TraversalOrder::Completion),
        })
    }

    /// Reconstructs the typed document from the stored canonical JSON.
    pub fn flow(&self) -> Result<FlowValue, ArtifactError> {
        serde_json::from_slice(&self.flow_json)
            .map_err(|e| ArtifactError::Generic(format!("Stored document is invalid: {}", e)))
    }

    /// Saves the artifact to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| {
            ArtifactError::Generic(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            ArtifactError::Generic(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Loads an artifact from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| {
            ArtifactError::Generic(format!("Could not open file '{}': {}", path, e))
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            ArtifactError::Generic(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Generic(format!("Serialization failed: {}", e)))
    }

    /// Deserializes an artifact from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(artifact, _)| artifact) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArtifactError::Generic(format!("Deserialization failed: {}", e)))
    }
}
