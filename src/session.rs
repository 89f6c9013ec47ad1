//! Editor session: working-draft lifecycle over the registry.

use tracing::warn;

use crate::{
    artifact::ImageArtifact,
    polish::{Polisher, polish_or_original},
    record::{DocumentPatch, ItemPatch, ProcesVerbal},
    registry::store::Registry,
    types::{DocStatus, DocumentId, ItemId, PhotoAngle, SignatureParty},
    validate::{derive_status, is_finalize_eligible},
};

/// Outcome of a save: the derived status plus whether the durable write stuck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Status derived and persisted at the moment of saving.
    pub status: DocStatus,
    /// False when the backing store rejected the write. The in-memory
    /// registry still holds the document and editing continues.
    pub durable: bool,
}

/// Owns the working draft and the registry of saved documents.
///
/// Edits mutate the draft only; nothing reaches the registry until an
/// explicit [`save`](Self::save). A draft that is never saved is discarded
/// when a new document is started.
pub struct EditorSession {
    registry: Registry,
    draft: ProcesVerbal,
}

impl EditorSession {
    /// Opens a session over `registry` with a fresh empty draft.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            draft: ProcesVerbal::new(),
        }
    }

    /// The working draft.
    pub fn draft(&self) -> &ProcesVerbal {
        &self.draft
    }

    /// The registry of saved documents.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Discards the working draft, saved or not, and starts a fresh document
    /// with a new id.
    pub fn start_new(&mut self) {
        self.draft = ProcesVerbal::new();
    }

    /// Applies a sparse document-field patch to the draft.
    pub fn apply(&mut self, patch: &DocumentPatch) {
        patch.apply_to(&mut self.draft);
    }

    /// Appends a fresh item, returning its id.
    pub fn add_item(&mut self) -> ItemId {
        self.draft.add_item()
    }

    /// Applies a sparse field patch to an item. No-op when absent.
    pub fn update_item(&mut self, id: ItemId, patch: &ItemPatch) {
        self.draft.update_item(id, patch);
    }

    /// Removes an item. No-op when absent.
    pub fn remove_item(&mut self, id: ItemId) {
        self.draft.remove_item(id);
    }

    /// Fills a photo slot by item and angle.
    pub fn set_photo(&mut self, item: ItemId, angle: PhotoAngle, image: ImageArtifact) {
        self.draft.set_photo(item, angle, image);
    }

    /// Empties a photo slot by item and angle.
    pub fn clear_photo(&mut self, item: ItemId, angle: PhotoAngle) {
        self.draft.clear_photo(item, angle);
    }

    /// Sets a signature slot.
    pub fn set_signature(&mut self, party: SignatureParty, image: ImageArtifact) {
        self.draft.set_signature(party, image);
    }

    /// Empties a signature slot.
    pub fn clear_signature(&mut self, party: SignatureParty) {
        self.draft.clear_signature(party);
    }

    /// True when the draft may be finalized. The same predicate decides the
    /// status written at save time.
    pub fn can_finalize(&self) -> bool {
        is_finalize_eligible(&self.draft)
    }

    /// Persists the draft into the registry.
    ///
    /// The status is re-derived and the save timestamp refreshed first. A
    /// failed durable write degrades to a memory-only save: the receipt
    /// reports it and nothing blocks further editing.
    pub fn save(&mut self) -> SaveReceipt {
        self.draft.status = derive_status(&self.draft);
        self.draft.touch();
        let status = self.draft.status;
        match self.registry.upsert(self.draft.clone()) {
            Ok(()) => SaveReceipt {
                status,
                durable: true,
            },
            Err(err) => {
                warn!(err = ?err, "registry write failed, keeping in-memory copy");
                SaveReceipt {
                    status,
                    durable: false,
                }
            }
        }
    }

    /// Replaces the working draft with the saved document `id`.
    ///
    /// Returns false, leaving the draft untouched, when absent.
    pub fn load(&mut self, id: DocumentId) -> bool {
        match self.registry.load_cloned(id) {
            Some(doc) => {
                self.draft = doc;
                true
            }
            None => false,
        }
    }

    /// Deletes a saved document. Idempotent when absent; a failed durable
    /// write is logged and the in-memory removal stands.
    pub fn delete(&mut self, id: DocumentId) -> bool {
        match self.registry.remove(id) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(err = ?err, "registry write failed after delete");
                true
            }
        }
    }

    /// Rewrites the draft's observations through `polisher`, keeping the
    /// original text on any failure. No-op when the observations are empty.
    pub async fn polish_observations(&mut self, polisher: &impl Polisher) {
        if self.draft.observations.is_empty() {
            return;
        }
        self.draft.observations = polish_or_original(polisher, &self.draft.observations).await;
    }
}
