//! PropertyMap: the ordered, uniquely keyed property set of an entity.

use hashbrown::HashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Property;

/// Properties keyed by qualified name, in first-insertion order.
///
/// Inserting an existing key replaces the stored property in place:
/// last write wins, position is kept.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: Vec<Property>,
    index: HashMap<String, usize>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the replaced property, if any.
    pub fn insert(&mut self, property: Property) -> Option<Property> {
        match self.index.get(&property.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], property)),
            None => {
                self.index.insert(property.name.clone(), self.entries.len());
                self.entries.push(property);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.index.get(name).map(|&slot| &mut self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.name.as_str())
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Property> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for property in iter {
            map.insert(property);
        }
        map
    }
}

impl Extend<Property> for PropertyMap {
    fn extend<I: IntoIterator<Item = Property>>(&mut self, iter: I) {
        for property in iter {
            self.insert(property);
        }
    }
}

// Serialized as a plain ordered list; the index is rebuilt on load.
impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Property>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
