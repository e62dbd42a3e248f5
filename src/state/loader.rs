//! Namespace loader.
//!
//! Builds the seed namespace for an execution from an ordered list of
//! prior checkpoint artifacts. Later artifacts overwrite earlier ones on
//! name collision. Any single unreadable or undecodable artifact aborts
//! the whole load - there is no partial recovery.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::EngineError;
use crate::runner::ds::env::Namespace;
use crate::state::artifact::decode_namespace;

/// Decode and merge `paths` in order into one seed namespace. An empty
/// list yields an empty namespace.
pub fn load_state_files<P: AsRef<Path>>(paths: &[P]) -> Result<Namespace, EngineError> {
    let mut seed = Namespace::new();
    for path in paths {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|e| EngineError::deserialization(path, e.to_string()))?;
        let decoded = decode_namespace(&bytes)
            .map_err(|e| EngineError::deserialization(path, e.to_string()))?;
        debug!(
            "loaded {} binding(s) from {}",
            decoded.len(),
            path.display()
        );
        seed.merge_from(decoded);
    }
    Ok(seed)
}
