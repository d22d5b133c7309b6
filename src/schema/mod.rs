//! # Record Schemas
//!
//! An explicit descriptor per native record type: the ordered field list with
//! the display metadata each field carries. Built once per type and consulted
//! by both marshal and unmarshal.
//!
//! ```rust
//! use gondor::schema::{FieldDef, Schema};
//! use gondor::Shape;
//!
//! let schema = Schema::new("Target")
//!     .field(FieldDef::leaf("os", Shape::Text).display("Operating System").strict("yes"))
//!     .field(FieldDef::leaf("hostname", Shape::Text))
//!     .field(FieldDef::leaf("ip", Shape::Text).display("IP Address").alias("address").overlay("W,image"));
//!
//! assert!(schema.check().unwrap().is_empty());
//! ```

pub mod record;

use std::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::codec::namespace;
use crate::model::{MatchingRule, OverlaySpec, Shape};
use crate::{Error, Result};

pub use record::{FieldValue, Record};

/// Deferred reference to another type's schema, so that schemas may name
/// each other (or themselves) without initialization order issues.
pub type SchemaRef = fn() -> &'static Schema;

/// What a field holds.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A scalar or container value, coerced with `Shape`.
    Leaf(Shape),
    /// A nested record, walked under its own namespace level.
    Record(SchemaRef),
    /// An embedded base record whose properties and display attributes are
    /// inherited by the owner.
    Base(SchemaRef),
}

/// One field of a record type and its metadata.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    /// Private fields are never read nor written.
    pub exported: bool,
    /// Display name. Its presence alone exposes a leaf field.
    pub display: Option<String>,
    /// Strict matching if present and non-empty.
    pub strict: Option<String>,
    pub alias: Option<String>,
    /// `"position[,kind]"` overlay annotation.
    pub overlay: Option<String>,
    pub hidden: bool,
    pub read_only: bool,
    pub sample: Option<String>,
}

impl FieldDef {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            exported: true,
            display: None,
            strict: None,
            alias: None,
            overlay: None,
            hidden: false,
            read_only: false,
            sample: None,
        }
    }

    pub fn leaf(name: impl Into<String>, shape: Shape) -> Self {
        Self::with_kind(name, FieldKind::Leaf(shape))
    }

    /// A leaf field whose shape is derived from its native type.
    pub fn of<T: FieldValue>(name: impl Into<String>) -> Self {
        Self::leaf(name, T::shape())
    }

    pub fn record(name: impl Into<String>, schema: SchemaRef) -> Self {
        Self::with_kind(name, FieldKind::Record(schema))
    }

    pub fn base(name: impl Into<String>, schema: SchemaRef) -> Self {
        Self::with_kind(name, FieldKind::Base(schema))
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn strict(mut self, value: impl Into<String>) -> Self {
        self.strict = Some(value.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn overlay(mut self, annotation: impl Into<String>) -> Self {
        self.overlay = Some(annotation.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn is_exposed(&self) -> bool {
        self.display.is_some()
    }

    pub fn matching_rule(&self) -> MatchingRule {
        match self.strict.as_deref() {
            Some(v) if !v.is_empty() => MatchingRule::Strict,
            _ => MatchingRule::Loose,
        }
    }

    /// Explicit alias, else the lower-cased field name.
    pub fn resolved_alias(&self) -> String {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias.to_owned(),
            _ => self.name.to_lowercase(),
        }
    }

    /// Display name, falling back to the field name when left empty.
    pub fn resolved_display(&self) -> String {
        match self.display.as_deref() {
            Some(display) if !display.is_empty() => display.to_owned(),
            _ => self.name.clone(),
        }
    }
}

/// Descriptor of a native record type.
#[derive(Debug, Clone)]
pub struct Schema {
    pub type_name: String,
    pub fields: Vec<FieldDef>,
}

/// Metadata that will be discarded or defaulted at marshal time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    pub type_name: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.type_name, self.field, self.message)
    }
}

impl Schema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), fields: Vec::new() }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Registration-time check: fails on a cyclic schema graph, otherwise
    /// returns (and logs) every metadata warning.
    pub fn check(&self) -> Result<Vec<SchemaWarning>> {
        self.check_acyclic()?;
        let warnings = self.validate();
        for w in &warnings {
            warn!(type_name = %w.type_name, field = %w.field, "{}", w.message);
        }
        Ok(warnings)
    }

    /// Fail with `CyclicSchema` if this type reaches itself through nested
    /// or base record fields.
    pub fn check_acyclic(&self) -> Result<()> {
        let mut path: SmallVec<[&str; 8]> = SmallVec::new();
        visit_acyclic(self, &mut path)
    }

    /// Collect warnings for metadata that marshal would silently drop or
    /// default. Assumes an acyclic graph; cycles are cut, not reported.
    pub fn validate(&self) -> Vec<SchemaWarning> {
        let mut warnings = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut path: SmallVec<[&str; 8]> = SmallVec::new();
        validate_fields(self, "", &mut seen, &mut path, &mut warnings);
        warnings
    }
}

fn visit_acyclic<'s>(schema: &'s Schema, path: &mut SmallVec<[&'s str; 8]>) -> Result<()> {
    if path.contains(&schema.type_name.as_str()) {
        let mut cycle: Vec<&str> = path.to_vec();
        cycle.push(&schema.type_name);
        return Err(Error::CyclicSchema(cycle.join(" -> ")));
    }
    path.push(&schema.type_name);
    for field in &schema.fields {
        if let FieldKind::Record(nested) | FieldKind::Base(nested) = field.kind {
            visit_acyclic(nested(), path)?;
        }
    }
    path.pop();
    Ok(())
}

fn validate_fields<'s>(
    schema: &'s Schema,
    namespace: &str,
    seen: &mut HashMap<String, String>,
    path: &mut SmallVec<[&'s str; 8]>,
    warnings: &mut Vec<SchemaWarning>,
) {
    if path.contains(&schema.type_name.as_str()) {
        return;
    }
    path.push(&schema.type_name);

    let mut report = |field: &FieldDef, message: String| {
        warnings.push(SchemaWarning {
            type_name: schema.type_name.clone(),
            field: field.name.clone(),
            message,
        });
    };

    for field in schema.fields.iter().filter(|f| f.exported) {
        match &field.kind {
            FieldKind::Leaf(shape) => {
                if !field.is_exposed() {
                    if field.overlay.is_some() || field.alias.is_some() || field.strict.is_some() {
                        report(field, "metadata on a field without a display name is ignored".into());
                    }
                    continue;
                }
                if let Some(annotation) = &field.overlay {
                    if let Some(w) = OverlaySpec::parse(annotation).warning {
                        report(field, w);
                    }
                }
                if let Shape::Opaque(name) = shape {
                    report(field, format!("{name} has no coercion rule, unmarshal will fail"));
                }
                let fqn = namespace::resolve(namespace, &field.name);
                let owner = format!("{}.{}", schema.type_name, field.name);
                if let Some(previous) = seen.insert(fqn.clone(), owner) {
                    report(field, format!("resolves to {fqn:?}, already used by {previous}"));
                }
            }
            FieldKind::Record(_) | FieldKind::Base(_) if field.is_exposed() => {
                report(field, "display name on a record field is ignored".into());
            }
            _ => {}
        }
    }

    for field in schema.fields.iter().filter(|f| f.exported) {
        if let FieldKind::Record(nested) = field.kind {
            let nested_ns = namespace::resolve(namespace, &field.name);
            validate_fields(nested(), &nested_ns, seen, path, warnings);
        }
    }

    path.pop();
}
