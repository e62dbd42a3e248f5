//! State capture: merge and persist the post-execution namespace.
//!
//! Two modes. Combined mode builds one output namespace from every name
//! in the mutated namespace that is either classified as capturable or
//! was inherited from the seed, and writes it to a single artifact -
//! letting a later stage reload the entire cumulative global state in one
//! step. Per-name mode writes each pure classified name to its own
//! single-binding artifact for selective downstream loading.
//!
//! Both modes are all-or-nothing: every artifact is written to a temp
//! file in the destination directory and atomically renamed into place,
//! and the first encode or I/O failure aborts the capture, so a crash
//! mid-write never leaves a corrupt artifact visible to a future loader.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::EngineError;
use crate::parser::static_semantics::{BindingKind, Classification};
use crate::runner::ds::env::Namespace;
use crate::state::artifact::{encode_namespace, ARTIFACT_EXT};

/// Build the combined output namespace. Values come from the mutated
/// (post-execution) namespace; membership is the union of classified
/// names and names inherited from the seed. Entries share objects with
/// `executed`, so aliasing among captured values survives into the
/// artifact.
pub fn capture_combined(
    classification: &Classification,
    seed: &Namespace,
    executed: &Namespace,
) -> Namespace {
    let mut output = Namespace::new();
    for (name, value) in executed.iter() {
        if classification.contains(name) || seed.contains(name) {
            output.set(name.clone(), value.clone());
        }
    }
    output
}

/// Encode `namespace` and atomically write it to `<output_base>.chk`.
pub fn write_combined(output_base: &str, namespace: &Namespace) -> Result<PathBuf, EngineError> {
    let path = PathBuf::from(format!("{}.{}", output_base, ARTIFACT_EXT));
    write_artifact(&path, namespace)?;
    debug!(
        "wrote {} binding(s) to {}",
        namespace.len(),
        path.display()
    );
    Ok(path)
}

/// Per-name capture: one single-binding artifact per classified name
/// whose value is a pure top-level result, written into `dir`. Variables
/// go to `var_<name>.chk`, functions to `func_<name>.chk`; each file
/// decodes as a one-entry namespace, so the loader can consume them
/// unchanged.
pub fn write_per_name(
    classification: &Classification,
    executed: &Namespace,
    dir: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
    let mut written = vec![];
    for (name, kind) in classification.iter() {
        let value = match executed.get(name) {
            Some(v) => v,
            // Classification is static; a classified name may never have
            // been defined during execution.
            None => continue,
        };
        let stem = match kind {
            BindingKind::GlobalFunction => format!("func_{}", name),
            BindingKind::GlobalVariable { pure: true } => format!("var_{}", name),
            BindingKind::GlobalVariable { pure: false } => continue,
        };
        let mut single = Namespace::new();
        single.set(name.clone(), value.clone());
        let path = dir.join(format!("{}.{}", stem, ARTIFACT_EXT));
        write_artifact(&path, &single)?;
        debug!("wrote '{}' to {}", name, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Atomic artifact write: encode, write to a temp file next to the
/// destination, then rename into place.
fn write_artifact(path: &Path, namespace: &Namespace) -> Result<(), EngineError> {
    let bytes = encode_namespace(namespace).map_err(|e| {
        EngineError::serialization(format!("cannot encode {}: {}", path.display(), e))
    })?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| EngineError::serialization(format!("{}: {}", path.display(), e)))?;
    tmp.write_all(&bytes)
        .map_err(|e| EngineError::serialization(format!("{}: {}", path.display(), e)))?;
    tmp.persist(path)
        .map_err(|e| EngineError::serialization(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
