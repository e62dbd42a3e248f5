//! Identity-preserving object-graph codec.
//!
//! A checkpoint artifact is a bincode-encoded graph: a flat table of heap
//! objects plus a name-to-slot root mapping. Reference values (lists,
//! functions) are assigned table ids keyed on their `Rc` pointer during
//! encoding, so a value reachable through several names or containers is
//! encoded once and every other occurrence becomes a back-reference.
//! Decoding runs in two phases (allocate shells, then fill), which also
//! reconstructs cyclic lists. Two distinct objects that happen to be
//! equal in value are never collapsed - identity is the key, not content.
//!
//! No forward compatibility across codec versions: the version field must
//! match exactly between producer and consumer.

use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::parser::ast::FunctionData;
use crate::runner::ds::env::Namespace;
use crate::runner::ds::value::Value;

/// File suffix for checkpoint artifacts.
pub const ARTIFACT_EXT: &str = "chk";

const ARTIFACT_MAGIC: [u8; 4] = *b"SCHK";

/// Bumped on any change to the encoded layout.
pub const CODEC_VERSION: u32 = 1;

#[derive(Debug)]
pub enum CodecError {
    /// The bytes do not start with the artifact magic.
    BadMagic,
    /// The artifact was produced by a different codec version.
    VersionMismatch { found: u32 },
    /// A slot references an object id past the end of the table.
    DanglingReference(u32),
    Encode(String),
    Decode(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::BadMagic => write!(f, "not a checkpoint artifact (bad magic)"),
            CodecError::VersionMismatch { found } => write!(
                f,
                "codec version mismatch (artifact v{}, expected v{})",
                found, CODEC_VERSION
            ),
            CodecError::DanglingReference(id) => {
                write!(f, "corrupt artifact: dangling object reference #{}", id)
            }
            CodecError::Encode(m) => write!(f, "{}", m),
            CodecError::Decode(m) => write!(f, "{}", m),
        }
    }
}

impl std::error::Error for CodecError {}

/// A scalar value or a back-reference into the object table.
#[derive(Debug, Serialize, Deserialize)]
enum Slot {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ref(u32),
}

/// One entry of the object table.
#[derive(Debug, Serialize, Deserialize)]
enum HeapEntry {
    List(Vec<Slot>),
    Function(FunctionData),
}

#[derive(Serialize, Deserialize)]
struct Artifact {
    magic: [u8; 4],
    version: u32,
    objects: Vec<HeapEntry>,
    roots: Vec<(String, Slot)>,
}

/// Encode a namespace to artifact bytes.
pub fn encode_namespace(namespace: &Namespace) -> Result<Vec<u8>, CodecError> {
    let mut encoder = GraphEncoder::new();
    // Root order is sorted for deterministic output.
    let mut entries: Vec<(&String, &Value)> = namespace.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let mut roots = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        roots.push((name.clone(), encoder.encode_value(value)));
    }
    let artifact = Artifact {
        magic: ARTIFACT_MAGIC,
        version: CODEC_VERSION,
        objects: encoder.objects,
        roots,
    };
    bincode::serialize(&artifact).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode artifact bytes back into a namespace, reconstructing the
/// sharing topology of the encoded object graph.
pub fn decode_namespace(bytes: &[u8]) -> Result<Namespace, CodecError> {
    match bytes.get(0..4) {
        Some(prefix) if prefix == ARTIFACT_MAGIC => {}
        _ => return Err(CodecError::BadMagic),
    }
    let artifact: Artifact =
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    if artifact.version != CODEC_VERSION {
        return Err(CodecError::VersionMismatch {
            found: artifact.version,
        });
    }

    // Phase 1: allocate a shell per table entry so back-references (and
    // cycles) can resolve before any entry is filled.
    let values: Vec<Value> = artifact
        .objects
        .iter()
        .map(|entry| match entry {
            HeapEntry::List(_) => Value::new_list(vec![]),
            HeapEntry::Function(data) => Value::Function(Rc::new(data.clone())),
        })
        .collect();

    // Phase 2: fill list entries.
    for (value, entry) in values.iter().zip(&artifact.objects) {
        if let (Value::List(list), HeapEntry::List(slots)) = (value, entry) {
            let mut items = list.borrow_mut();
            for slot in slots {
                items.push(resolve_slot(slot, &values)?);
            }
        }
    }

    let mut namespace = Namespace::new();
    for (name, slot) in &artifact.roots {
        namespace.set(name.clone(), resolve_slot(slot, &values)?);
    }
    Ok(namespace)
}

fn resolve_slot(slot: &Slot, values: &[Value]) -> Result<Value, CodecError> {
    Ok(match slot {
        Slot::Null => Value::Null,
        Slot::Bool(b) => Value::Bool(*b),
        Slot::Int(i) => Value::Int(*i),
        Slot::Float(f) => Value::Float(*f),
        Slot::Str(s) => Value::Str(s.clone()),
        Slot::Ref(id) => values
            .get(*id as usize)
            .cloned()
            .ok_or(CodecError::DanglingReference(*id))?,
    })
}

struct GraphEncoder {
    objects: Vec<HeapEntry>,
    /// `Rc` pointer address to object-table id.
    ids: HashMap<usize, u32>,
}

impl GraphEncoder {
    fn new() -> Self {
        GraphEncoder {
            objects: vec![],
            ids: HashMap::new(),
        }
    }

    fn encode_value(&mut self, value: &Value) -> Slot {
        match value {
            Value::Null => Slot::Null,
            Value::Bool(b) => Slot::Bool(*b),
            Value::Int(i) => Slot::Int(*i),
            Value::Float(f) => Slot::Float(*f),
            Value::Str(s) => Slot::Str(s.clone()),
            Value::List(list) => {
                let key = Rc::as_ptr(list) as usize;
                if let Some(&id) = self.ids.get(&key) {
                    return Slot::Ref(id);
                }
                // Reserve the id before recursing so a list reachable
                // from itself encodes as a back-reference.
                let id = self.objects.len() as u32;
                self.ids.insert(key, id);
                self.objects.push(HeapEntry::List(vec![]));
                let mut slots = Vec::with_capacity(list.borrow().len());
                for item in list.borrow().iter() {
                    slots.push(self.encode_value(item));
                }
                self.objects[id as usize] = HeapEntry::List(slots);
                Slot::Ref(id)
            }
            Value::Function(function) => {
                let key = Rc::as_ptr(function) as usize;
                if let Some(&id) = self.ids.get(&key) {
                    return Slot::Ref(id);
                }
                let id = self.objects.len() as u32;
                self.ids.insert(key, id);
                self.objects
                    .push(HeapEntry::Function(function.as_ref().clone()));
                Slot::Ref(id)
            }
        }
    }
}
