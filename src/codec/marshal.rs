//! Marshaling: flatten a native record into an entity's property set.

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::model::{Entity, EntityState, OverlaySpec, Property};
use crate::schema::{FieldDef, FieldKind, FieldValue, Record};
use crate::schema::record::unknown_field;
use crate::{Error, Result};

use super::{merge, namespace, CodecConfig, CollisionPolicy};

/// Type names on the current walk path.
pub(crate) type TypePath = SmallVec<[&'static str; 8]>;

/// Marshal a record into a fresh entity.
pub fn marshal(record: &dyn Record, config: &CodecConfig) -> Result<Entity> {
    let mut path = TypePath::new();
    marshal_state(record, config, &mut path).map(Entity::from_state)
}

/// Fallback for values that are not records: one property named after the
/// native type, carrying the raw value.
pub fn marshal_opaque<T: FieldValue>(value: &T) -> Entity {
    let type_name = std::any::type_name::<T>();
    let mut state = EntityState::new(type_name);
    state.add_property(
        Property::new(format!("type#{type_name}"), value.to_value())
            .with_display(format!("Native type: {type_name}")),
    );
    Entity::from_state(state)
}

fn marshal_state(record: &dyn Record, config: &CodecConfig, path: &mut TypePath) -> Result<EntityState> {
    let mut walker = Walker {
        config,
        state: EntityState::new(record.schema().type_name.as_str()),
        emitted: HashSet::new(),
        inherited_labels: 0,
        path,
    };
    walker.walk("", record, None)?;

    let inherited = walker.inherited_labels;
    let mut state = walker.state;
    record.decorate(&mut state);
    if config.dedup_base_labels && inherited > 0 {
        dedup_inherited_labels(&mut state, inherited);
    }
    state.write_display_properties();
    Ok(state)
}

/// Drop inherited labels (the first `inherited`) whose title the record
/// itself uses.
fn dedup_inherited_labels(state: &mut EntityState, inherited: usize) {
    let own = state.labels.split_off(inherited.min(state.labels.len()));
    state.labels.retain(|label| !own.iter().any(|o| o.name == label.name));
    state.labels.extend(own);
}

pub(crate) fn enter(path: &mut TypePath, type_name: &'static str) -> Result<()> {
    if path.contains(&type_name) {
        let mut cycle: Vec<&str> = path.to_vec();
        cycle.push(type_name);
        return Err(Error::CyclicSchema(cycle.join(" -> ")));
    }
    path.push(type_name);
    Ok(())
}

struct Walker<'a> {
    config: &'a CodecConfig,
    state: EntityState,
    /// Names written by this record's own fields, for collision detection.
    emitted: HashSet<String>,
    /// Leading labels that came from bases.
    inherited_labels: usize,
    path: &'a mut TypePath,
}

impl Walker<'_> {
    fn walk(&mut self, namespace: &str, record: &dyn Record, field: Option<&FieldDef>) -> Result<()> {
        let schema = record.schema();
        enter(self.path, &schema.type_name)?;

        // Bases first, so the record's own fields override what they inherit.
        for base_field in schema.fields.iter().filter(|f| f.exported) {
            if !matches!(base_field.kind, FieldKind::Base(_)) {
                continue;
            }
            match record.record(&base_field.name) {
                Some(base) => {
                    let base_state = marshal_state(base, self.config, self.path)?;
                    merge::merge_base(&base_state, &mut self.state, self.config);
                    self.inherited_labels = self.state.labels.len();
                }
                None => debug!(field = %base_field.name, "base record absent, nothing inherited"),
            }
        }

        if self.config.emit_markers {
            let marker = Property::new(
                namespace::resolve(namespace, &schema.type_name),
                self.config.marker_sentinel.as_str(),
            )
            .with_display(schema.type_name.as_str());
            self.state.markers.insert(marker);
        }

        let namespace = match field {
            Some(f) => namespace::resolve(namespace, &f.name),
            None => namespace.to_owned(),
        };

        for field in schema.fields.iter().filter(|f| f.exported) {
            match &field.kind {
                FieldKind::Base(_) => {}
                FieldKind::Record(_) => {
                    if let Some(nested) = record.record(&field.name) {
                        self.walk(&namespace, nested, Some(field))?;
                    }
                }
                FieldKind::Leaf(_) if field.is_exposed() => self.add_field(&namespace, record, field)?,
                FieldKind::Leaf(_) => {}
            }
        }

        self.path.pop();
        Ok(())
    }

    fn add_field(&mut self, namespace: &str, record: &dyn Record, field: &FieldDef) -> Result<()> {
        let name = namespace::resolve(namespace, &field.name);
        let value = record.get(&field.name).ok_or_else(|| unknown_field(record, &field.name))?;

        let mut property = Property::new(name.as_str(), value)
            .with_display(field.resolved_display())
            .with_alias(field.resolved_alias())
            .with_matching_rule(field.matching_rule());
        property.hidden = field.hidden;
        property.read_only = field.read_only;
        property.sample = field.sample.clone();

        if !self.emitted.insert(name.clone()) {
            match self.config.collisions {
                CollisionPolicy::Reject => return Err(Error::NamespaceCollision(name)),
                CollisionPolicy::Overwrite => {
                    warn!(property = %name, "namespace collision, last write wins")
                }
            }
        }
        self.state.add_property(property);

        if let Some(annotation) = &field.overlay {
            let parsed = OverlaySpec::parse(annotation);
            if let Some(w) = parsed.warning {
                warn!(property = %name, "{w}");
            }
            if let Some(spec) = parsed.spec {
                self.state.add_overlay(name, spec.position, spec.kind);
            }
        }
        Ok(())
    }
}
