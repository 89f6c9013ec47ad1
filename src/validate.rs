//! Completeness predicates gating finalization and the persisted status.

use crate::{record::ProcesVerbal, types::DocStatus};

/// True when every completeness rule holds: non-empty title, at least one
/// item, every item named with all four photos populated, and both
/// signatures present.
///
/// This predicate and [`derive_status`] are the single source of truth for
/// all gating decisions; no other code path duplicates these conditions.
pub fn is_finalize_eligible(doc: &ProcesVerbal) -> bool {
    !doc.title.is_empty()
        && !doc.items.is_empty()
        && doc.items.iter().all(|item| {
            !item.name.is_empty() && item.photos.iter().all(|slot| slot.image.is_some())
        })
        && doc.signature_predator.is_some()
        && doc.signature_primitor.is_some()
}

/// Derives the persisted status. Re-evaluated at the moment of persistence,
/// never cached.
pub fn derive_status(doc: &ProcesVerbal) -> DocStatus {
    if is_finalize_eligible(doc) {
        DocStatus::Completed
    } else {
        DocStatus::Draft
    }
}
