//! Base-entity merging: fold an embedded base record's entity into its owner.

use tracing::debug;

use crate::model::{
    BookmarkColor, EntityState, LineThickness, LinkDirection, LinkShowLabel, LinkStyle,
    BOOKMARK_KEY, LINK_COLOR_KEY, LINK_DIRECTION_KEY, LINK_LABEL_KEY, LINK_NAME_KEY,
    LINK_SHOW_LABEL_KEY, LINK_STYLE_KEY, LINK_THICKNESS_KEY,
};

use super::CodecConfig;

/// Merge `base` into `into`.
///
/// Every base property is copied into the owner's keyed map, so anything the
/// owner sets afterwards under the same key wins. Link attributes and the
/// bookmark are read back from their synthetic keys. Base labels go ahead of
/// the owner's own labels. Base overlays fill positions the owner left free.
pub fn merge_base(base: &EntityState, into: &mut EntityState, config: &CodecConfig) {
    debug!(base = %base.type_name, owner = %into.type_name, "merging base entity");

    into.properties.extend(base.properties.iter().cloned());
    into.markers.extend(base.markers.iter().cloned());

    for (position, overlay) in &base.overlays {
        into.overlays.entry(*position).or_insert_with(|| overlay.clone());
    }
    if into.icon_url.is_none() {
        into.icon_url = base.icon_url.clone();
    }

    into.link.color = into.property_value(LINK_COLOR_KEY);
    into.link.style = LinkStyle::from_wire(&into.property_value(LINK_STYLE_KEY)).unwrap_or_default();
    into.link.thickness =
        LineThickness::from_wire(&into.property_value(LINK_THICKNESS_KEY)).unwrap_or_default();
    into.link.label = into.property_value(LINK_LABEL_KEY);
    into.link.direction =
        LinkDirection::from_wire(&into.property_value(LINK_DIRECTION_KEY)).unwrap_or_default();
    into.link.show_label =
        LinkShowLabel::from_wire(&into.property_value(LINK_SHOW_LABEL_KEY)).unwrap_or_default();
    into.link.name = into.property_value(LINK_NAME_KEY);
    into.bookmark = BookmarkColor::from_wire(&into.property_value(BOOKMARK_KEY)).unwrap_or_default();

    let mut labels = base.labels.clone();
    if config.dedup_base_labels {
        labels.retain(|label| !into.labels.iter().any(|own| own.name == label.name));
    }
    labels.append(&mut into.labels);
    into.labels = labels;
}
