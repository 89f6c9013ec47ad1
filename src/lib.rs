//! Handover-record ("proces verbal") lifecycle and evidence capture.
//!
//! A field operator assembles a structured handover record: identifying
//! metadata, inspected items each requiring four fixed-angle photographs,
//! free-text observations, and two handwritten signatures. This crate holds
//! the record model and its completeness rules, the camera negotiation state
//! machine, the signature raster surface, and the durable registry of saved
//! documents.
//!
//! # Examples
//!
//! In-memory usage with [`session::EditorSession`]:
//! ```
//! use reportero::{
//!     record::{DocumentPatch, ItemPatch},
//!     registry::store::Registry,
//!     session::EditorSession,
//!     types::DocStatus,
//! };
//!
//! let mut session = EditorSession::new(Registry::in_memory());
//! session.apply(&DocumentPatch {
//!     title: Some("Predare Echipament IT".to_string()),
//!     ..DocumentPatch::default()
//! });
//! let item = session.add_item();
//! session.update_item(item, &ItemPatch {
//!     name: Some("Laptop".to_string()),
//!     ..ItemPatch::default()
//! });
//!
//! // Photos and signatures are still missing.
//! assert!(!session.can_finalize());
//! let receipt = session.save();
//! assert_eq!(receipt.status, DocStatus::Draft);
//! assert_eq!(session.registry().len(), 1);
//! ```
//!
//! Durable registry over the SQLite slot:
//! ```no_run
//! use reportero::{
//!     persist::{PersistError, sqlite::SqliteSlot},
//!     registry::store::Registry,
//!     session::EditorSession,
//! };
//!
//! # fn main() -> Result<(), PersistError> {
//! let slot = SqliteSlot::open("registry.db")?;
//! let mut session = EditorSession::new(Registry::open(Box::new(slot)));
//! let receipt = session.save();
//! assert!(receipt.durable);
//! # Ok(())
//! # }
//! ```

/// Self-contained encoded-image values.
pub mod artifact;
/// Camera negotiation and frame capture.
pub mod capture;
/// Storage-port abstraction and SQLite slot implementation.
pub mod persist;
/// External text-polisher client and fallback.
pub mod polish;
/// Document, item, and photo-slot records and patches.
pub mod record;
/// Authoritative in-memory registry of saved documents.
pub mod registry;
/// Editor session tying the draft, registry, and polisher together.
pub mod session;
/// Freehand signature raster surface.
pub mod signature;
/// Shared identifier types and closed enums.
pub mod types;
/// Completeness predicates.
pub mod validate;
