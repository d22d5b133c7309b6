//! # Property Codec
//!
//! The bidirectional engine between native records and entity properties.
//!
//! ```text
//! record ──marshal──▶ Entity { properties, markers, overlays, link, labels }
//!   ▲                                   │
//!   └────────────unmarshal──────────────┘  (string values coerced per Shape)
//! ```
//!
//! Pure functions over a `Record` and a `PropertyMap`. No I/O, no async.

pub mod namespace;
pub mod coerce;
pub mod marshal;
pub mod unmarshal;
pub mod merge;

use serde::{Deserialize, Serialize};

pub use coerce::{coerce, coerce_entry};
pub use marshal::{marshal, marshal_opaque};
pub use merge::merge_base;
pub use namespace::resolve;
pub use unmarshal::unmarshal;

/// Sentinel value of structural marker entries.
pub const DEFAULT_MARKER_SENTINEL: &str = "native type";

/// What marshal does when two fields of one record resolve to the same
/// property name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the later field, log a warning.
    #[default]
    Overwrite,
    /// Fail with `Error::NamespaceCollision`.
    Reject,
}

/// Codec settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Emit one structural marker per record walked.
    pub emit_markers: bool,
    pub marker_sentinel: String,
    pub collisions: CollisionPolicy,
    /// Drop base labels whose name the owner already uses.
    pub dedup_base_labels: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            emit_markers: true,
            marker_sentinel: DEFAULT_MARKER_SENTINEL.to_owned(),
            collisions: CollisionPolicy::Overwrite,
            dedup_base_labels: false,
        }
    }
}
