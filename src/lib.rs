//! # gondor: native records ⇄ graph entity properties
//!
//! Flattens nested native records into the ordered, namespaced, typed
//! property set a graph-visualization client understands, and populates
//! native records back from incoming string-valued properties.
//!
//! ## Design Principles
//!
//! 1. **Schema-first**: every record type carries an explicit `Schema`
//!    (ordered fields + display metadata), built once, read by both directions
//! 2. **Clean DTOs**: `Entity`, `Property`, `Value` are pure data
//! 3. **Coercion is a pure function**: `(string, Shape) → Value`
//! 4. **No transport**: the wire envelope is somebody else's job
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::LazyLock;
//! use gondor::schema::{FieldDef, FieldValue, Record, Schema};
//! use gondor::{marshal_to_properties, unmarshal_from_properties, Value};
//!
//! #[derive(Default)]
//! struct Target { ip: String, port: u16 }
//!
//! static TARGET: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::new("Target")
//!         .field(FieldDef::of::<String>("ip").display("IP Address").overlay("W"))
//!         .field(FieldDef::of::<u16>("port").display("Port"))
//! });
//!
//! impl Record for Target {
//!     fn schema(&self) -> &'static Schema { &TARGET }
//!     fn get(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "ip" => Some(self.ip.to_value()),
//!             "port" => Some(self.port.to_value()),
//!             _ => None,
//!         }
//!     }
//!     fn set(&mut self, field: &str, value: Value) -> gondor::Result<()> {
//!         match field {
//!             "ip" => self.ip = FieldValue::from_value(value)?,
//!             "port" => self.port = FieldValue::from_value(value)?,
//!             _ => return Err(gondor::schema::record::unknown_field(self, field)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> gondor::Result<()> {
//! let entity = marshal_to_properties(&Target { ip: "10.0.0.1".into(), port: 22 })?;
//! assert_eq!(entity.property_value("port"), "22");
//!
//! let mut copy = Target::default();
//! entity.with_state(|s| unmarshal_from_properties(&s.properties, &mut copy))?;
//! assert_eq!(copy.port, 22);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod schema;
pub mod codec;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Entity, EntityState, Property, PropertyMap, MatchingRule, Value, Shape,
    Overlay, OverlayKind, OverlayPosition, Link, Label, BookmarkColor,
};

// ============================================================================
// Re-exports: Schema & Codec
// ============================================================================

pub use schema::{FieldDef, FieldKind, FieldValue, Record, Schema, SchemaWarning};
pub use codec::{CodecConfig, CollisionPolicy};

// ============================================================================
// Entry points
// ============================================================================

/// Flatten a native record into a fresh entity, with default settings.
pub fn marshal_to_properties(record: &dyn Record) -> Result<Entity> {
    codec::marshal(record, &CodecConfig::default())
}

/// Flatten a native record into a fresh entity.
pub fn marshal_to_properties_with(record: &dyn Record, config: &CodecConfig) -> Result<Entity> {
    codec::marshal(record, config)
}

/// Populate a native record from a property set.
pub fn unmarshal_from_properties(properties: &PropertyMap, target: &mut dyn Record) -> Result<()> {
    codec::unmarshal(properties, target)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: cannot read {input:?} as {target}: {message}")]
    ParseError { input: String, target: String, message: String },

    #[error("Range error: {input:?} does not fit in {target}")]
    RangeError { input: String, target: String },

    #[error("Unsupported shape: no coercion rule for {0}")]
    UnsupportedShape(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Cyclic schema: {0}")]
    CyclicSchema(String),

    #[error("Namespace collision: {0} written by two fields")]
    NamespaceCollision(String),

    #[error("Unknown field {field} on {record}")]
    UnknownField { record: String, field: String },
}

impl Error {
    pub(crate) fn parse(input: &str, target: &Shape, message: impl Into<String>) -> Self {
        Error::ParseError {
            input: input.to_owned(),
            target: target.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn range(input: &str, target: &Shape) -> Self {
        Error::RangeError { input: input.to_owned(), target: target.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
