//! Shared identifier types and closed domain enums.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque document identifier, generated once at creation.
pub type DocumentId = Uuid;
/// Item identifier, unique within its document.
pub type ItemId = Uuid;

/// Fixed photographing angle.
///
/// The set is closed: every item carries exactly one slot per angle for its
/// entire lifetime, and a slot's angle never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhotoAngle {
    /// Front view.
    Front,
    /// Back view.
    Back,
    /// Left side view.
    Left,
    /// Right side view.
    Right,
}

impl PhotoAngle {
    /// All four angles in slot order.
    pub const ALL: [PhotoAngle; 4] = [
        PhotoAngle::Front,
        PhotoAngle::Back,
        PhotoAngle::Left,
        PhotoAngle::Right,
    ];

    /// Display label as printed on the handover report.
    pub fn label(self) -> &'static str {
        match self {
            PhotoAngle::Front => "Față",
            PhotoAngle::Back => "Spate",
            PhotoAngle::Left => "Lateral Stânga",
            PhotoAngle::Right => "Lateral Dreapta",
        }
    }
}

/// Document status, derived from the completeness predicate at save time.
///
/// Never set directly by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    /// Incomplete; the default for every new document.
    Draft,
    /// Every completeness rule held at the moment of saving.
    Completed,
}

/// Which of the two signature slots a stroke capture targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureParty {
    /// The handing-over party ("predător").
    Predator,
    /// The receiving party ("primitor").
    Primitor,
}
