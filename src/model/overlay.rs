//! Overlays: positioned visual annotations referencing an entity property.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where an overlay sits relative to the entity icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverlayPosition {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "C")]
    Center,
}

/// What the overlay renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    #[default]
    Text,
    Image,
    #[serde(rename = "color", alias = "colour")]
    Colour,
}

/// An overlay. Never owns data: `property` names the entity property
/// whose value is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub property: String,
    pub position: OverlayPosition,
    pub kind: OverlayKind,
}

/// Overlays of an entity, one per position.
pub type Overlays = BTreeMap<OverlayPosition, Overlay>;

impl OverlayPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayPosition::North => "N",
            OverlayPosition::South => "S",
            OverlayPosition::West => "W",
            OverlayPosition::NorthWest => "NW",
            OverlayPosition::SouthWest => "SW",
            OverlayPosition::Center => "C",
        }
    }
}

impl FromStr for OverlayPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "N" => Ok(OverlayPosition::North),
            "S" => Ok(OverlayPosition::South),
            "W" => Ok(OverlayPosition::West),
            "NW" => Ok(OverlayPosition::NorthWest),
            "SW" => Ok(OverlayPosition::SouthWest),
            "C" => Ok(OverlayPosition::Center),
            other => Err(format!("invalid overlay position {other:?}")),
        }
    }
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(OverlayKind::Text),
            "image" => Ok(OverlayKind::Image),
            "colour" | "color" => Ok(OverlayKind::Colour),
            other => Err(format!("invalid overlay kind {other:?}")),
        }
    }
}

// ============================================================================
// Annotation parsing
// ============================================================================

/// A parsed `"position[,kind]"` overlay annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySpec {
    pub position: OverlayPosition,
    pub kind: OverlayKind,
}

/// Outcome of lenient overlay parsing: the overlay to attach (if any) and
/// what was discarded or defaulted on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOverlay {
    pub spec: Option<OverlaySpec>,
    pub warning: Option<String>,
}

impl OverlaySpec {
    /// Parse an overlay annotation.
    ///
    /// An invalid or missing kind degrades to `text`. An invalid position,
    /// an empty annotation, or more than two parts drops the overlay.
    pub fn parse(annotation: &str) -> ParsedOverlay {
        let parts: Vec<&str> = annotation.split(',').collect();
        let dropped = |warning: String| ParsedOverlay { spec: None, warning: Some(warning) };

        match parts.as_slice() {
            [only] if only.trim().is_empty() => dropped("empty overlay annotation".into()),
            [position] => match position.parse::<OverlayPosition>() {
                Ok(position) => ParsedOverlay {
                    spec: Some(OverlaySpec { position, kind: OverlayKind::Text }),
                    warning: None,
                },
                Err(e) => dropped(format!("{e}, overlay dropped")),
            },
            [position, kind] => {
                let position = match position.parse::<OverlayPosition>() {
                    Ok(position) => position,
                    Err(e) => return dropped(format!("{e}, overlay dropped")),
                };
                match kind.parse::<OverlayKind>() {
                    Ok(kind) => ParsedOverlay {
                        spec: Some(OverlaySpec { position, kind }),
                        warning: None,
                    },
                    Err(e) => ParsedOverlay {
                        spec: Some(OverlaySpec { position, kind: OverlayKind::Text }),
                        warning: Some(format!("{e}, defaulting to text")),
                    },
                }
            }
            _ => dropped(format!("overlay annotation {annotation:?} has too many parts, overlay dropped")),
        }
    }
}
