use super::definition::FunnelData;
use crate::error::BundleError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// Bumped whenever the layout of `FunnelData` changes.
pub const BUNDLE_VERSION: u32 = 1;

/// A converted funnel packaged for static bundling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunnelBundle {
    pub version: u32,
    pub funnel: FunnelData,
}

impl FunnelBundle {
    pub fn new(funnel: FunnelData) -> Self {
        Self {
            version: BUNDLE_VERSION,
            funnel,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BundleError> {
        encode_to_vec(self, standard()).map_err(|e| BundleError::Encode(e.to_string()))
    }

    /// Saves the bundle to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), BundleError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| BundleError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| BundleError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads a bundle from a file.
    pub fn from_file(path: &str) -> Result<Self, BundleError> {
        let mut file = fs::File::open(path).map_err(|e| BundleError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| BundleError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a bundle from a byte slice, rejecting other layout versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BundleError> {
        let bundle: Self = decode_from_slice(bytes, standard())
            .map(|(bundle, _)| bundle) // bincode 2 returns (data, bytes_read)
            .map_err(|e| BundleError::Decode(e.to_string()))?;
        if bundle.version != BUNDLE_VERSION {
            return Err(BundleError::Decode(format!(
                "unsupported bundle version {} (expected {})",
                bundle.version, BUNDLE_VERSION
            )));
        }
        Ok(bundle)
    }
}
