use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    persist::{PersistResult, StoragePort},
    record::ProcesVerbal,
    types::DocumentId,
};

/// Version number for serialized [`RegistrySnapshotV1`] payloads.
pub const REGISTRY_FORMAT_VERSION: u16 = 1;

/// Serialized whole-registry payload written to the storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshotV1 {
    /// Documents in listing order, most recently saved first.
    pub documents: Vec<ProcesVerbal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryEnvelope {
    format_version: u16,
    snapshot: RegistrySnapshotV1,
}

/// Keyed collection of saved documents with most-recent-first listing.
///
/// The in-memory state is authoritative for the session. When a storage port
/// is attached, the full serialized registry is written through after every
/// successful upsert and remove; a failed write surfaces as an error without
/// touching the in-memory state already mutated.
pub struct Registry {
    docs: HashMap<DocumentId, ProcesVerbal>,
    order: Vec<DocumentId>,
    port: Option<Box<dyn StoragePort>>,
}

impl Registry {
    /// Creates an empty registry with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            docs: HashMap::new(),
            order: Vec::new(),
            port: None,
        }
    }

    /// Opens a registry over `port`, reading the slot once.
    ///
    /// A missing, corrupt, or unreadable payload yields an empty registry,
    /// never an error.
    pub fn open(mut port: Box<dyn StoragePort>) -> Self {
        let snapshot = match port.read() {
            Ok(Some(payload)) => decode_snapshot(&payload),
            Ok(None) => None,
            Err(err) => {
                warn!(err = ?err, "registry slot unreadable, starting empty");
                None
            }
        };

        let mut registry = Self {
            docs: HashMap::new(),
            order: Vec::new(),
            port: Some(port),
        };
        if let Some(snapshot) = snapshot {
            for doc in snapshot.documents {
                if registry.docs.contains_key(&doc.id) {
                    continue;
                }
                registry.order.push(doc.id);
                registry.docs.insert(doc.id, doc);
            }
        }
        registry
    }

    /// Restores a registry from a snapshot, without durable backing.
    pub fn from_snapshot(snapshot: RegistrySnapshotV1) -> Self {
        let mut registry = Self::in_memory();
        for doc in snapshot.documents {
            if registry.docs.contains_key(&doc.id) {
                continue;
            }
            registry.order.push(doc.id);
            registry.docs.insert(doc.id, doc);
        }
        registry
    }

    /// Exports the current state in listing order.
    pub fn export_snapshot(&self) -> RegistrySnapshotV1 {
        RegistrySnapshotV1 {
            documents: self
                .order
                .iter()
                .filter_map(|id| self.docs.get(id).cloned())
                .collect(),
        }
    }

    /// Inserts or replaces `doc` by id, then writes the slot.
    ///
    /// A new id is prepended as most recent; an existing id is replaced in
    /// place, keeping its position in the listing. An `Err` means the durable
    /// write failed after the in-memory registry was already updated.
    pub fn upsert(&mut self, doc: ProcesVerbal) -> PersistResult<()> {
        let id = doc.id;
        if !self.docs.contains_key(&id) {
            self.order.insert(0, id);
        }
        self.docs.insert(id, doc);
        self.persist()
    }

    /// Removes the document with `id`, then writes the slot.
    ///
    /// `Ok(false)` when absent (nothing is written). An `Err` means the
    /// document was removed in memory but the durable write failed.
    pub fn remove(&mut self, id: DocumentId) -> PersistResult<bool> {
        if self.docs.remove(&id).is_none() {
            return Ok(false);
        }
        self.order.retain(|d| *d != id);
        self.persist()?;
        Ok(true)
    }

    /// The document with `id`, if saved.
    pub fn load(&self, id: DocumentId) -> Option<&ProcesVerbal> {
        self.docs.get(&id)
    }

    /// Cloned variant of [`load`](Self::load).
    pub fn load_cloned(&self, id: DocumentId) -> Option<ProcesVerbal> {
        self.load(id).cloned()
    }

    /// All documents, most recently saved first.
    pub fn list(&self) -> Vec<&ProcesVerbal> {
        self.order
            .iter()
            .filter_map(|id| self.docs.get(id))
            .collect()
    }

    /// Cloned variant of [`list`](Self::list).
    pub fn list_cloned(&self) -> Vec<ProcesVerbal> {
        self.list().into_iter().cloned().collect()
    }

    /// Number of saved documents.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn persist(&mut self) -> PersistResult<()> {
        if self.port.is_none() {
            return Ok(());
        }
        let envelope = RegistryEnvelope {
            format_version: REGISTRY_FORMAT_VERSION,
            snapshot: self.export_snapshot(),
        };
        let payload = serde_json::to_vec(&envelope)?;
        if let Some(port) = self.port.as_mut() {
            port.write(&payload)?;
        }
        Ok(())
    }
}

fn decode_snapshot(payload: &[u8]) -> Option<RegistrySnapshotV1> {
    match serde_json::from_slice::<RegistryEnvelope>(payload) {
        Ok(envelope) if envelope.format_version == REGISTRY_FORMAT_VERSION => {
            Some(envelope.snapshot)
        }
        Ok(envelope) => {
            warn!(
                version = envelope.format_version,
                "unsupported registry payload version, starting empty"
            );
            None
        }
        Err(err) => {
            warn!(err = %err, "corrupt registry payload, starting empty");
            None
        }
    }
}
