//! Entity: the flat property model produced from a native record, plus its
//! display attributes.

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    BookmarkColor, Label, Link, Overlay, OverlayKind, OverlayPosition, Overlays, Property,
    PropertyMap, Value, NOTES_KEY,
};

/// Title given to labels added without one.
pub const DEFAULT_LABEL_TITLE: &str = "Info";

/// Unguarded entity contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Name of the native type this entity was built from.
    pub type_name: String,
    pub display_name: String,
    /// The entity's own value, shown under its icon.
    pub value: String,
    pub weight: i64,
    pub icon_url: Option<String>,
    pub link: Link,
    pub bookmark: BookmarkColor,
    pub overlays: Overlays,
    pub labels: Vec<Label>,
    /// User-visible properties, keyed by qualified name.
    pub properties: PropertyMap,
    /// Structural grouping markers, one per record walked.
    pub markers: PropertyMap,
}

impl EntityState {
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            display_name: type_name.clone(),
            type_name,
            ..Self::default()
        }
    }

    /// Insert or overwrite a property.
    pub fn add_property(&mut self, property: Property) -> Option<Property> {
        self.properties.insert(property)
    }

    /// Set the overlay at `position`, replacing any previous one there.
    pub fn add_overlay(&mut self, property: impl Into<String>, position: OverlayPosition, kind: OverlayKind) {
        let overlay = Overlay { property: property.into(), position, kind };
        self.overlays.insert(position, overlay);
    }

    /// Append a label. An empty title becomes [`DEFAULT_LABEL_TITLE`].
    pub fn add_label(&mut self, title: &str, content: impl Into<String>) {
        let title = if title.is_empty() { DEFAULT_LABEL_TITLE } else { title };
        self.labels.push(Label::new(title, content));
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.add_property(Property::new(NOTES_KEY, Value::String(note.into())).with_display("Notes"));
    }

    /// Wire value of a property, empty if absent.
    pub fn property_value(&self, name: &str) -> String {
        self.properties.get(name).map(Property::wire_value).unwrap_or_default()
    }

    /// Write link attributes, link fields and bookmark to their synthetic
    /// property keys.
    pub fn write_display_properties(&mut self) {
        let link_props = self.link.to_properties();
        self.properties.extend(link_props);
        let bookmark = self.bookmark.to_property();
        self.properties.insert(bookmark);
    }
}

// ============================================================================
// Entity
// ============================================================================

/// An entity guarded by one coarse lock.
///
/// Structural mutation takes the write lock, lookups the read lock, so
/// concurrent marshal and unmarshal calls on the same entity never interleave.
#[derive(Debug, Default)]
pub struct Entity {
    state: RwLock<EntityState>,
}

impl Entity {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::from_state(EntityState::new(type_name))
    }

    pub fn from_state(state: EntityState) -> Self {
        Self { state: RwLock::new(state) }
    }

    /// Run `f` under the read lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&EntityState) -> R) -> R {
        f(&self.state.read())
    }

    /// Run `f` under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut EntityState) -> R) -> R {
        f(&mut self.state.write())
    }

    pub fn snapshot(&self) -> EntityState {
        self.state.read().clone()
    }

    pub fn into_state(self) -> EntityState {
        self.state.into_inner()
    }

    // ========================================================================
    // User API
    // ========================================================================

    pub fn add_property(&self, property: Property) {
        self.state.write().add_property(property);
    }

    pub fn add_overlay(&self, property: impl Into<String>, position: OverlayPosition, kind: OverlayKind) {
        self.state.write().add_overlay(property, position, kind);
    }

    pub fn add_label(&self, title: &str, content: impl Into<String>) {
        self.state.write().add_label(title, content);
    }

    pub fn set_note(&self, note: impl Into<String>) {
        self.state.write().set_note(note);
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.state.write().value = value.into();
    }

    pub fn set_weight(&self, weight: i64) {
        self.state.write().weight = weight;
    }

    pub fn set_icon_url(&self, url: impl Into<String>) {
        self.state.write().icon_url = Some(url.into());
    }

    pub fn property(&self, name: &str) -> Option<Property> {
        self.state.read().properties.get(name).cloned()
    }

    /// Wire value of a property, empty if absent.
    pub fn property_value(&self, name: &str) -> String {
        self.state.read().property_value(name)
    }

    pub fn properties(&self) -> Vec<Property> {
        self.state.read().properties.iter().cloned().collect()
    }

    pub fn property_names(&self) -> Vec<String> {
        self.state.read().properties.names().map(str::to_owned).collect()
    }

    pub fn markers(&self) -> Vec<Property> {
        self.state.read().markers.iter().cloned().collect()
    }

    pub fn overlays(&self) -> Overlays {
        self.state.read().overlays.clone()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.state.read().labels.clone()
    }

    pub fn link(&self) -> Link {
        self.state.read().link.clone()
    }

    pub fn bookmark(&self) -> BookmarkColor {
        self.state.read().bookmark
    }

    pub fn type_name(&self) -> String {
        self.state.read().type_name.clone()
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        Self::from_state(self.snapshot())
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        *self.state.read() == *other.state.read()
    }
}

impl From<EntityState> for Entity {
    fn from(state: EntityState) -> Self {
        Self::from_state(state)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state.read().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EntityState::deserialize(deserializer).map(Entity::from_state)
    }
}
