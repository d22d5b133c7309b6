//! Unmarshaling: populate a native record from an entity's property set.

use tracing::debug;

use crate::model::{Entity, PropertyMap, Shape, Value};
use crate::schema::{FieldKind, Record};
use crate::schema::record::unknown_field;
use crate::Result;

use super::coerce::{coerce, coerce_entry};
use super::marshal::{enter, TypePath};
use super::namespace;

/// Populate `target` from `properties`.
///
/// Fields with no matching property keep their current value. The first
/// coercion failure aborts the walk; fields already written stay written.
pub fn unmarshal(properties: &PropertyMap, target: &mut dyn Record) -> Result<()> {
    let mut path = TypePath::new();
    unmarshal_record(properties, "", target, &mut path)
}

impl Entity {
    /// Populate `target` from this entity's properties, holding the read
    /// lock for the whole walk.
    pub fn unmarshal(&self, target: &mut dyn Record) -> Result<()> {
        self.with_state(|state| unmarshal(&state.properties, target))
    }
}

fn unmarshal_record(
    properties: &PropertyMap,
    namespace: &str,
    target: &mut dyn Record,
    path: &mut TypePath,
) -> Result<()> {
    let schema = target.schema();
    enter(path, &schema.type_name)?;

    for field in schema.fields.iter().filter(|f| f.exported) {
        match &field.kind {
            // Nested records are entered whether or not they carry a display
            // name: their own leaves may be exposed.
            FieldKind::Record(_) => {
                let nested_ns = namespace::resolve(namespace, &field.name);
                if let Some(nested) = target.record_mut(&field.name) {
                    unmarshal_record(properties, &nested_ns, nested, path)?;
                }
            }
            // A base was marshaled as a standalone entity, so its properties
            // sit at the root namespace.
            FieldKind::Base(_) => {
                if let Some(base) = target.record_mut(&field.name) {
                    unmarshal_record(properties, "", base, path)?;
                }
            }
            FieldKind::Leaf(_) if !field.is_exposed() => {}
            FieldKind::Leaf(shape) => {
                let fqn = namespace::resolve(namespace, &field.name);
                let Some(property) = properties.get(&fqn) else {
                    debug!(property = %fqn, "no property, field left unchanged");
                    continue;
                };

                let Some(mut slot) = target.get(&field.name) else {
                    return Err(unknown_field(&*target, &field.name));
                };
                match &property.value {
                    Value::Null => {
                        debug!(property = %fqn, "null property, field left unchanged");
                        continue;
                    }
                    Value::List(items) if takes_occurrences(shape) => {
                        for item in items {
                            coerce(&item.to_wire_string(), shape, &mut slot)?;
                        }
                    }
                    Value::Map(entries) if takes_occurrences(shape) => {
                        for (k, v) in entries {
                            coerce_entry(&k.to_wire_string(), &v.to_wire_string(), shape, &mut slot)?;
                        }
                    }
                    other => coerce(&other.to_wire_string(), shape, &mut slot)?,
                }
                target.set(&field.name, slot)?;
            }
        }
    }

    path.pop();
    Ok(())
}

/// Shapes that grow by one element per coercion, and so take pre-aggregated
/// occurrences one at a time.
fn takes_occurrences(shape: &Shape) -> bool {
    match shape {
        Shape::Seq(_) | Shape::Map(_, _) => true,
        Shape::Optional(inner) => takes_occurrences(inner),
        _ => false,
    }
}
