//! Fixture records shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::LazyLock;

use gondor::model::LinkShowLabel;
use gondor::schema::record::unknown_field;
use gondor::schema::{FieldDef, FieldValue, Record, Schema};
use gondor::{BookmarkColor, EntityState, Result, Shape, Value};

// ============================================================================
// Scalars: every field exposed
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Scalars {
    pub name: String,
    pub enabled: bool,
    pub small: i8,
    pub medium: i32,
    pub big: i64,
    pub byte: u8,
    pub count: u64,
    pub ratio: f64,
    pub approx: f32,
    pub timeout: chrono::TimeDelta,
    pub tags: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub nickname: Option<String>,
}

impl Default for Scalars {
    fn default() -> Self {
        Self {
            name: String::new(),
            enabled: false,
            small: 0,
            medium: 0,
            big: 0,
            byte: 0,
            count: 0,
            ratio: 0.0,
            approx: 0.0,
            timeout: chrono::TimeDelta::zero(),
            tags: Vec::new(),
            attrs: BTreeMap::new(),
            nickname: None,
        }
    }
}

static SCALARS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Scalars")
        .field(FieldDef::of::<String>("name").display("Name").strict("yes"))
        .field(FieldDef::of::<bool>("enabled").display("Enabled"))
        .field(FieldDef::of::<i8>("small").display("Small"))
        .field(FieldDef::of::<i32>("medium").display("Medium"))
        .field(FieldDef::of::<i64>("big").display("Big"))
        .field(FieldDef::of::<u8>("byte").display("Byte"))
        .field(FieldDef::of::<u64>("count").display("Count"))
        .field(FieldDef::of::<f64>("ratio").display("Ratio"))
        .field(FieldDef::of::<f32>("approx").display("Approx"))
        .field(FieldDef::of::<chrono::TimeDelta>("timeout").display("Timeout"))
        .field(FieldDef::of::<Vec<String>>("tags").display("Tags"))
        .field(FieldDef::of::<BTreeMap<String, String>>("attrs").display("Attributes"))
        .field(FieldDef::of::<Option<String>>("nickname").display("Nickname"))
});

impl Record for Scalars {
    fn schema(&self) -> &'static Schema {
        &SCALARS
    }

    fn get(&self, field: &str) -> Option<Value> {
        let value = match field {
            "name" => self.name.to_value(),
            "enabled" => self.enabled.to_value(),
            "small" => self.small.to_value(),
            "medium" => self.medium.to_value(),
            "big" => self.big.to_value(),
            "byte" => self.byte.to_value(),
            "count" => self.count.to_value(),
            "ratio" => self.ratio.to_value(),
            "approx" => self.approx.to_value(),
            "timeout" => self.timeout.to_value(),
            "tags" => self.tags.to_value(),
            "attrs" => self.attrs.to_value(),
            "nickname" => self.nickname.to_value(),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "name" => self.name = FieldValue::from_value(value)?,
            "enabled" => self.enabled = FieldValue::from_value(value)?,
            "small" => self.small = FieldValue::from_value(value)?,
            "medium" => self.medium = FieldValue::from_value(value)?,
            "big" => self.big = FieldValue::from_value(value)?,
            "byte" => self.byte = FieldValue::from_value(value)?,
            "count" => self.count = FieldValue::from_value(value)?,
            "ratio" => self.ratio = FieldValue::from_value(value)?,
            "approx" => self.approx = FieldValue::from_value(value)?,
            "timeout" => self.timeout = FieldValue::from_value(value)?,
            "tags" => self.tags = FieldValue::from_value(value)?,
            "attrs" => self.attrs = FieldValue::from_value(value)?,
            "nickname" => self.nickname = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }
}

// ============================================================================
// Person → Address: nested records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
    pub floor: i32,
}

static ADDRESS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Address")
        .field(FieldDef::of::<String>("City").display("City"))
        .field(FieldDef::of::<String>("Zip").display("Postcode").strict("yes").alias("postcode").overlay("S,text"))
        // Not exposed: never marshaled, never populated.
        .field(FieldDef::of::<i32>("Floor"))
});

impl Record for Address {
    fn schema(&self) -> &'static Schema {
        &ADDRESS
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "City" => Some(self.city.to_value()),
            "Zip" => Some(self.zip.to_value()),
            "Floor" => Some(self.floor.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "City" => self.city = FieldValue::from_value(value)?,
            "Zip" => self.zip = FieldValue::from_value(value)?,
            "Floor" => self.floor = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub password: String,
    pub home: Address,
    pub work: Option<Address>,
}

static PERSON: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Person")
        .field(FieldDef::of::<String>("Name").display("Full Name").overlay("NW,text"))
        .field(FieldDef::of::<String>("Email"))
        .field(FieldDef::of::<String>("Password").display("Password").private())
        .field(FieldDef::record("Home", || &*ADDRESS))
        .field(FieldDef::record("Work", || &*ADDRESS))
});

impl Record for Person {
    fn schema(&self) -> &'static Schema {
        &PERSON
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "Name" => Some(self.name.to_value()),
            "Email" => Some(self.email.to_value()),
            "Password" => Some(self.password.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "Name" => self.name = FieldValue::from_value(value)?,
            "Email" => self.email = FieldValue::from_value(value)?,
            "Password" => self.password = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }

    fn record(&self, field: &str) -> Option<&dyn Record> {
        match field {
            "Home" => Some(&self.home),
            "Work" => self.work.as_ref().map(|w| w as &dyn Record),
            _ => None,
        }
    }

    fn record_mut(&mut self, field: &str) -> Option<&mut dyn Record> {
        match field {
            "Home" => Some(&mut self.home),
            "Work" => Some(self.work.get_or_insert_with(Address::default)),
            _ => None,
        }
    }
}

// ============================================================================
// Server embeds Host as its base entity
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host {
    pub hostname: String,
    pub p: String,
}

static HOST: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Host")
        .field(FieldDef::of::<String>("hostname").display("Hostname").overlay("W,image"))
        .field(FieldDef::of::<String>("p").display("P"))
});

impl Record for Host {
    fn schema(&self) -> &'static Schema {
        &HOST
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "hostname" => Some(self.hostname.to_value()),
            "p" => Some(self.p.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "hostname" => self.hostname = FieldValue::from_value(value)?,
            "p" => self.p = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }

    fn decorate(&self, entity: &mut EntityState) {
        entity.link.color = "#43eb36".into();
        entity.link.name = "hosts".into();
        entity.link.show_label = LinkShowLabel::Hide;
        entity.link.reverse();
        entity.bookmark = BookmarkColor::Red;
        entity.add_label("Seen", "by host scan");
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    pub base: Host,
    pub p: String,
    pub os: String,
}

static SERVER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Server")
        .field(FieldDef::of::<String>("p").display("P"))
        .field(FieldDef::of::<String>("os").display("Operating System").overlay("N,image"))
        // Declared last on purpose: bases are processed first regardless.
        .field(FieldDef::base("base", || &*HOST))
});

impl Record for Server {
    fn schema(&self) -> &'static Schema {
        &SERVER
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "p" => Some(self.p.to_value()),
            "os" => Some(self.os.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "p" => self.p = FieldValue::from_value(value)?,
            "os" => self.os = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }

    fn record(&self, field: &str) -> Option<&dyn Record> {
        match field {
            "base" => Some(&self.base),
            _ => None,
        }
    }

    fn record_mut(&mut self, field: &str) -> Option<&mut dyn Record> {
        match field {
            "base" => Some(&mut self.base),
            _ => None,
        }
    }

    fn decorate(&self, entity: &mut EntityState) {
        entity.add_label("Seen", "by server");
    }
}

// ============================================================================
// Clash: a leaf and a nested field resolving to the same name
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clash {
    pub flat: String,
    pub home: Address,
}

static CLASH: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Clash")
        .field(FieldDef::of::<String>("home.city").display("Flat City"))
        .field(FieldDef::record("home", || &*ADDRESS))
});

impl Record for Clash {
    fn schema(&self) -> &'static Schema {
        &CLASH
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "home.city" => Some(self.flat.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "home.city" => self.flat = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }

    fn record(&self, field: &str) -> Option<&dyn Record> {
        (field == "home").then_some(&self.home as &dyn Record)
    }

    fn record_mut(&mut self, field: &str) -> Option<&mut dyn Record> {
        if field == "home" { Some(&mut self.home) } else { None }
    }
}

// ============================================================================
// Chain: a self-referencing record type
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    pub label: String,
    pub next: Option<Box<Chain>>,
}

static CHAIN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Chain")
        .field(FieldDef::of::<String>("label").display("Label"))
        .field(FieldDef::record("next", || &*CHAIN))
});

impl Record for Chain {
    fn schema(&self) -> &'static Schema {
        &CHAIN
    }

    fn get(&self, field: &str) -> Option<Value> {
        (field == "label").then(|| self.label.to_value())
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "label" => self.label = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }

    fn record(&self, field: &str) -> Option<&dyn Record> {
        match field {
            "next" => self.next.as_deref().map(|n| n as &dyn Record),
            _ => None,
        }
    }
}

// ============================================================================
// Opaque: a field with no coercion rule
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Socket {
    pub name: String,
    pub handle: String,
}

static SOCKET: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("Socket")
        .field(FieldDef::of::<String>("name").display("Name"))
        .field(FieldDef::leaf("handle", Shape::Opaque("RawFd".into())).display("Handle"))
});

impl Record for Socket {
    fn schema(&self) -> &'static Schema {
        &SOCKET
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(self.name.to_value()),
            "handle" => Some(self.handle.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "name" => self.name = FieldValue::from_value(value)?,
            "handle" => self.handle = FieldValue::from_value(value)?,
            _ => return Err(unknown_field(self, field)),
        }
        Ok(())
    }
}
