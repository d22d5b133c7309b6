//! Secondary display attributes: link, bookmark, labels.
//!
//! Links and bookmarks have no structural slot in the property set, so they
//! round-trip through well-known synthetic property keys.

use serde::{Deserialize, Serialize};

use super::Property;

// ============================================================================
// Synthetic property keys
// ============================================================================

pub const LINK_COLOR_KEY: &str = "link#maltego.link.color";
pub const LINK_STYLE_KEY: &str = "link#maltego.link.style";
pub const LINK_THICKNESS_KEY: &str = "link#maltego.link.thickness";
pub const LINK_LABEL_KEY: &str = "link#maltego.link.label";
pub const LINK_DIRECTION_KEY: &str = "link#maltego.link.direction";
pub const LINK_SHOW_LABEL_KEY: &str = "link#maltego.link.show-label";
pub const LINK_NAME_KEY: &str = "link#maltego.link.name";
pub const BOOKMARK_KEY: &str = "bookmark#";
pub const NOTES_KEY: &str = "notes#";

/// Content type of every label.
pub const LABEL_CONTENT_TYPE: &str = "text/html";

// ============================================================================
// Link
// ============================================================================

/// Line style of the link drawn to an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStyle {
    #[default]
    Normal = 0,
    Dashed = 1,
    Dotted = 2,
    DashDot = 3,
}

/// Line thickness of the link drawn to an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineThickness {
    #[default]
    VeryThin = 0,
    Thin = 1,
    Normal = 2,
    Thick = 3,
    VeryThick = 4,
}

/// Whether the link label is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkShowLabel {
    /// Follow the client's global setting.
    #[default]
    Global = 0,
    Show = 1,
    Hide = 2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkDirection {
    #[default]
    InputToOutput,
    OutputToInput,
    Bidirectional,
}

impl LinkStyle {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().parse::<i64>().ok()? {
            0 => Some(LinkStyle::Normal),
            1 => Some(LinkStyle::Dashed),
            2 => Some(LinkStyle::Dotted),
            3 => Some(LinkStyle::DashDot),
            _ => None,
        }
    }
}

impl LineThickness {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().parse::<i64>().ok()? {
            0 => Some(LineThickness::VeryThin),
            1 => Some(LineThickness::Thin),
            2 => Some(LineThickness::Normal),
            3 => Some(LineThickness::Thick),
            4 => Some(LineThickness::VeryThick),
            _ => None,
        }
    }
}

impl LinkShowLabel {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().parse::<i64>().ok()? {
            0 => Some(LinkShowLabel::Global),
            1 => Some(LinkShowLabel::Show),
            2 => Some(LinkShowLabel::Hide),
            _ => None,
        }
    }
}

impl LinkDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkDirection::InputToOutput => "input-to-output",
            LinkDirection::OutputToInput => "output-to-input",
            LinkDirection::Bidirectional => "bidirectional",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim() {
            "input-to-output" => Some(LinkDirection::InputToOutput),
            "output-to-input" => Some(LinkDirection::OutputToInput),
            "bidirectional" => Some(LinkDirection::Bidirectional),
            _ => None,
        }
    }
}

/// The link between an entity and the entity it was produced from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub style: LinkStyle,
    pub thickness: LineThickness,
    pub show_label: LinkShowLabel,
    /// RGB color code, e.g. `#43eb36`.
    pub color: String,
    pub direction: LinkDirection,
    pub label: String,
    /// Custom link fields, emitted alongside the entity properties.
    pub properties: Vec<Property>,
}

impl Link {
    /// Draw the link from output to input instead.
    pub fn reverse(&mut self) {
        self.direction = LinkDirection::OutputToInput;
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// The link attributes as synthetic properties.
    pub fn to_properties(&self) -> Vec<Property> {
        let mut props = vec![
            Property::new(LINK_COLOR_KEY, self.color.as_str()).with_display("LinkColor"),
            Property::new(LINK_STYLE_KEY, self.style as i64).with_display("LinkStyle"),
            Property::new(LINK_THICKNESS_KEY, self.thickness as i64).with_display("Thickness"),
            Property::new(LINK_LABEL_KEY, self.label.as_str()).with_display("Label"),
            Property::new(LINK_DIRECTION_KEY, self.direction.as_str()),
            Property::new(LINK_SHOW_LABEL_KEY, self.show_label as i64).with_display("Show Label"),
            Property::new(LINK_NAME_KEY, self.name.as_str()).with_display("Link Name"),
        ];
        props.extend(self.properties.iter().cloned());
        props
    }
}

// ============================================================================
// Bookmark
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookmarkColor {
    #[default]
    None,
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
}

impl BookmarkColor {
    pub fn as_wire(&self) -> &'static str {
        match self {
            BookmarkColor::None => "-1",
            BookmarkColor::Blue => "0",
            BookmarkColor::Green => "1",
            BookmarkColor::Yellow => "2",
            BookmarkColor::Purple => "3",
            BookmarkColor::Red => "4",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim() {
            "-1" => Some(BookmarkColor::None),
            "0" => Some(BookmarkColor::Blue),
            "1" => Some(BookmarkColor::Green),
            "2" => Some(BookmarkColor::Yellow),
            "3" => Some(BookmarkColor::Purple),
            "4" => Some(BookmarkColor::Red),
            _ => None,
        }
    }

    pub fn to_property(&self) -> Property {
        Property::new(BOOKMARK_KEY, self.as_wire()).with_display("Bookmark")
    }
}

// ============================================================================
// Label
// ============================================================================

/// Extra display information shown in the client's detail view.
///
/// Only transmitted in responses; labels never feed a later transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub content: String,
    pub content_type: String,
}

impl Label {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: LABEL_CONTENT_TYPE.to_owned(),
        }
    }
}
