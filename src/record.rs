//! Handover document, item, and photo-slot records plus sparse patches.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    artifact::ImageArtifact,
    types::{DocStatus, DocumentId, ItemId, PhotoAngle, SignatureParty},
};

/// Condition text a newly added item starts with.
pub const DEFAULT_CONDITION: &str = "Bun";

/// One fixed-angle photo slot on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSlot {
    /// Fixed angle; never changes after the slot is created.
    pub angle: PhotoAngle,
    /// Captured image, or `None` while the slot is still empty.
    pub image: Option<ImageArtifact>,
}

/// One physical object being handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    /// Item identifier, unique within the document.
    pub id: ItemId,
    /// Object name; must be non-empty for the document to complete.
    pub name: String,
    /// Serial number, free text.
    pub serial_number: String,
    /// Condition notes, free text.
    pub condition: String,
    /// Exactly four slots, one per angle, in [`PhotoAngle::ALL`] order.
    pub photos: [PhotoSlot; 4],
}

impl ReportItem {
    /// Creates an item with a fresh id and all four photo slots empty.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            serial_number: String::new(),
            condition: DEFAULT_CONDITION.to_string(),
            photos: PhotoAngle::ALL.map(|angle| PhotoSlot { angle, image: None }),
        }
    }

    /// The captured image for `angle`, if any.
    pub fn photo(&self, angle: PhotoAngle) -> Option<&ImageArtifact> {
        self.photos
            .iter()
            .find(|slot| slot.angle == angle)
            .and_then(|slot| slot.image.as_ref())
    }
}

impl Default for ReportItem {
    fn default() -> Self {
        Self::new()
    }
}

/// One handover record ("proces verbal").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcesVerbal {
    /// Opaque identity, generated once at creation, immutable.
    pub id: DocumentId,
    /// Transaction title.
    pub title: String,
    /// Document date as entered, ISO `YYYY-MM-DD`.
    pub date: String,
    /// Epoch millis of the last save; refreshed on each save.
    pub created_at: u64,
    /// Handover location.
    pub location: String,
    /// Handing-over party name.
    pub predator: String,
    /// Receiving party name.
    pub primitor: String,
    /// Other people present.
    pub participants: String,
    /// Purpose of the handover.
    pub purpose: String,
    /// Inspected items; insertion order drives report numbering.
    pub items: Vec<ReportItem>,
    /// Free-text final observations.
    pub observations: String,
    /// Handing-over party signature, if captured.
    pub signature_predator: Option<ImageArtifact>,
    /// Receiving party signature, if captured.
    pub signature_primitor: Option<ImageArtifact>,
    /// Derived status, recomputed at every save.
    pub status: DocStatus,
}

impl ProcesVerbal {
    /// Creates an empty draft with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            date: String::new(),
            created_at: now_ms(),
            location: String::new(),
            predator: String::new(),
            primitor: String::new(),
            participants: String::new(),
            purpose: String::new(),
            items: Vec::new(),
            observations: String::new(),
            signature_predator: None,
            signature_primitor: None,
            status: DocStatus::Draft,
        }
    }

    /// Appends a fresh item with all four photo slots empty, returning its id.
    pub fn add_item(&mut self) -> ItemId {
        let item = ReportItem::new();
        let id = item.id;
        self.items.push(item);
        id
    }

    /// The item with `id`, if present.
    pub fn item(&self, id: ItemId) -> Option<&ReportItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Applies a sparse field patch to the item with `id`. No-op when absent.
    pub fn update_item(&mut self, id: ItemId, patch: &ItemPatch) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            patch.apply_to(item);
        }
    }

    /// Removes the item with `id`. No-op when absent.
    pub fn remove_item(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    /// Fills the photo slot at (`item`, `angle`). No-op when the item is absent.
    pub fn set_photo(&mut self, item: ItemId, angle: PhotoAngle, image: ImageArtifact) {
        if let Some(slot) = self.photo_slot_mut(item, angle) {
            slot.image = Some(image);
        }
    }

    /// Empties the photo slot at (`item`, `angle`). No-op when the item is absent.
    pub fn clear_photo(&mut self, item: ItemId, angle: PhotoAngle) {
        if let Some(slot) = self.photo_slot_mut(item, angle) {
            slot.image = None;
        }
    }

    /// The signature for `party`, if captured.
    pub fn signature(&self, party: SignatureParty) -> Option<&ImageArtifact> {
        match party {
            SignatureParty::Predator => self.signature_predator.as_ref(),
            SignatureParty::Primitor => self.signature_primitor.as_ref(),
        }
    }

    /// Sets the signature slot for `party`.
    pub fn set_signature(&mut self, party: SignatureParty, image: ImageArtifact) {
        *self.signature_slot_mut(party) = Some(image);
    }

    /// Empties the signature slot for `party`.
    pub fn clear_signature(&mut self, party: SignatureParty) {
        *self.signature_slot_mut(party) = None;
    }

    /// Refreshes the save timestamp.
    pub fn touch(&mut self) {
        self.created_at = now_ms();
    }

    fn photo_slot_mut(&mut self, item: ItemId, angle: PhotoAngle) -> Option<&mut PhotoSlot> {
        self.items
            .iter_mut()
            .find(|i| i.id == item)?
            .photos
            .iter_mut()
            .find(|slot| slot.angle == angle)
    }

    fn signature_slot_mut(&mut self, party: SignatureParty) -> &mut Option<ImageArtifact> {
        match party {
            SignatureParty::Predator => &mut self.signature_predator,
            SignatureParty::Primitor => &mut self.signature_primitor,
        }
    }
}

impl Default for ProcesVerbal {
    fn default() -> Self {
        Self::new()
    }
}

/// Sparse document-field patch where each `Some` field overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentPatch {
    /// Optional replacement for the title.
    pub title: Option<String>,
    /// Optional replacement for the document date.
    pub date: Option<String>,
    /// Optional replacement for the location.
    pub location: Option<String>,
    /// Optional replacement for the handing-over party name.
    pub predator: Option<String>,
    /// Optional replacement for the receiving party name.
    pub primitor: Option<String>,
    /// Optional replacement for the participants.
    pub participants: Option<String>,
    /// Optional replacement for the purpose.
    pub purpose: Option<String>,
    /// Optional replacement for the observations.
    pub observations: Option<String>,
}

impl DocumentPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `doc`.
    pub fn apply_to(&self, doc: &mut ProcesVerbal) {
        if let Some(v) = &self.title {
            doc.title = v.clone();
        }
        if let Some(v) = &self.date {
            doc.date = v.clone();
        }
        if let Some(v) = &self.location {
            doc.location = v.clone();
        }
        if let Some(v) = &self.predator {
            doc.predator = v.clone();
        }
        if let Some(v) = &self.primitor {
            doc.primitor = v.clone();
        }
        if let Some(v) = &self.participants {
            doc.participants = v.clone();
        }
        if let Some(v) = &self.purpose {
            doc.purpose = v.clone();
        }
        if let Some(v) = &self.observations {
            doc.observations = v.clone();
        }
    }
}

/// Sparse item-field patch where each `Some` field overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPatch {
    /// Optional replacement for the name.
    pub name: Option<String>,
    /// Optional replacement for the serial number.
    pub serial_number: Option<String>,
    /// Optional replacement for the condition notes.
    pub condition: Option<String>,
}

impl ItemPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `item`.
    pub fn apply_to(&self, item: &mut ReportItem) {
        if let Some(v) = &self.name {
            item.name = v.clone();
        }
        if let Some(v) = &self.serial_number {
            item.serial_number = v.clone();
        }
        if let Some(v) = &self.condition {
            item.condition = v.clone();
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
