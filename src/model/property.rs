//! Property: a single named, display-annotated value of an entity.

use serde::{Deserialize, Serialize};

use super::Value;

/// How the visualization tool decides whether two entities are the same node.
///
/// Opaque to this crate: it is carried, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingRule {
    /// Merge only if every field, value included, is equal.
    Strict,
    /// Merge if the entity values are equal.
    #[default]
    Loose,
}

impl MatchingRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingRule::Strict => "strict",
            MatchingRule::Loose => "loose",
        }
    }
}

/// A property of an entity, keyed by its qualified name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Qualified (namespaced) name. Unique within one entity.
    pub name: String,
    pub display: String,
    pub alias: String,
    pub matching_rule: MatchingRule,
    pub value: Value,
    pub hidden: bool,
    pub read_only: bool,
    /// Value shown when the entity is created by hand in the client.
    pub sample: Option<String>,
}

impl Property {
    /// A loose, visible property whose display name and alias default to `name`.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        Self {
            display: name.clone(),
            alias: name.clone(),
            name,
            matching_rule: MatchingRule::Loose,
            value: value.into(),
            hidden: false,
            read_only: false,
            sample: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_matching_rule(mut self, rule: MatchingRule) -> Self {
        self.matching_rule = rule;
        self
    }

    pub fn strict(self) -> Self {
        self.with_matching_rule(MatchingRule::Strict)
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }

    /// The value as it travels on the wire.
    pub fn wire_value(&self) -> String {
        self.value.to_wire_string()
    }
}
