//! # Entity Property Model
//!
//! The flat, ordered, namespaced property set understood by the
//! visualization client, and the display attributes that travel with it.
//!
//! Design rule: this module is pure data. No I/O, no reflection over
//! native records (that lives in `schema` and `codec`).

pub mod value;
pub mod property;
pub mod property_map;
pub mod overlay;
pub mod display;
pub mod entity;

pub use value::{Value, Shape};
pub use property::{Property, MatchingRule};
pub use property_map::PropertyMap;
pub use overlay::{Overlay, OverlayKind, OverlayPosition, OverlaySpec, Overlays, ParsedOverlay};
pub use display::{
    BookmarkColor, Label, LineThickness, Link, LinkDirection, LinkShowLabel, LinkStyle,
    BOOKMARK_KEY, LABEL_CONTENT_TYPE, LINK_COLOR_KEY, LINK_DIRECTION_KEY, LINK_LABEL_KEY,
    LINK_NAME_KEY, LINK_SHOW_LABEL_KEY, LINK_STYLE_KEY, LINK_THICKNESS_KEY, NOTES_KEY,
};
pub use entity::{Entity, EntityState, DEFAULT_LABEL_TITLE};
