//! # Record Schemas
//!
//! A schema is plain data: a name and an ordered list of typed fields. The
//! generic codec in [`crate::algorithms::codec`] consumes it; record types
//! never serialize themselves.

use serde::{Deserialize, Serialize};

use super::errors::CodecError;

/// Primitive field encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// 1-byte unsigned integer.
    U8,
    /// 2-byte little-endian unsigned integer.
    U16,
    /// 4-byte little-endian unsigned integer.
    U32,
    /// 8-byte little-endian unsigned integer.
    U64,
    /// 16-byte little-endian unsigned integer.
    U128,
    /// u32 LE byte length followed by UTF-8 bytes.
    String,
}

impl FieldType {
    /// Encoded width for integers, `None` for strings.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            FieldType::U8 => Some(1),
            FieldType::U16 => Some(2),
            FieldType::U32 => Some(4),
            FieldType::U64 => Some(8),
            FieldType::U128 => Some(16),
            FieldType::String => None,
        }
    }

    /// Zero value of this type.
    pub fn zero(self) -> Value {
        match self {
            FieldType::U8 => Value::U8(0),
            FieldType::U16 => Value::U16(0),
            FieldType::U32 => Value::U32(0),
            FieldType::U64 => Value::U64(0),
            FieldType::U128 => Value::U128(0),
            FieldType::String => Value::String(String::new()),
        }
    }
}

/// One named field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: &'static str,
    /// Field encoding.
    pub ty: FieldType,
}

impl FieldDef {
    /// Declare a field.
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Static, ordered field list for a record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schema {
    /// Record type name.
    pub name: &'static str,
    /// Fields in encoding order.
    pub fields: &'static [FieldDef],
}

impl Schema {
    /// Declare a schema.
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { name, fields }
    }

    /// Zero-valued instance, used to size storage.
    pub fn default_record(&self) -> Record {
        Record::new(self.fields.iter().map(|f| f.ty.zero()).collect())
    }

    /// Position of a field by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A typed field value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// u8 value.
    U8(u8),
    /// u16 value.
    U16(u16),
    /// u32 value.
    U32(u32),
    /// u64 value.
    U64(u64),
    /// u128 value.
    U128(u128),
    /// String value.
    String(String),
}

impl Value {
    /// The field type this value encodes as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::U8(_) => FieldType::U8,
            Value::U16(_) => FieldType::U16,
            Value::U32(_) => FieldType::U32,
            Value::U64(_) => FieldType::U64,
            Value::U128(_) => FieldType::U128,
            Value::String(_) => FieldType::String,
        }
    }
}

/// Field values in schema order.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    /// Build from ordered values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Ordered values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Take ownership of the values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value of a named field.
    pub fn get(&self, schema: &Schema, name: &str) -> Option<&Value> {
        schema.index_of(name).and_then(|i| self.values.get(i))
    }
}

/// A Rust type bound to a static schema.
///
/// Implementors only convert to and from the generic [`Record`]; the byte
/// layout lives entirely in the schema.
pub trait SchemaRecord: Sized {
    /// The type's schema.
    const SCHEMA: Schema;

    /// Convert into schema-ordered values.
    fn to_record(&self) -> Record;

    /// Rebuild from schema-ordered values.
    fn from_record(record: Record) -> Result<Self, CodecError>;
}

const GREETING_FIELDS: &[FieldDef] = &[
    FieldDef::new("message", FieldType::String),
    FieldDef::new("counter", FieldType::U32),
];

/// The greeting record: a message and a counter.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GreetingAccount {
    /// Greeting text.
    pub message: String,
    /// Greeting counter.
    pub counter: u32,
}

impl GreetingAccount {
    /// Build a greeting.
    pub fn new(message: impl Into<String>, counter: u32) -> Self {
        Self {
            message: message.into(),
            counter,
        }
    }
}

impl SchemaRecord for GreetingAccount {
    const SCHEMA: Schema = Schema::new("GreetingAccount", GREETING_FIELDS);

    fn to_record(&self) -> Record {
        Record::new(vec![
            Value::String(self.message.clone()),
            Value::U32(self.counter),
        ])
    }

    fn from_record(record: Record) -> Result<Self, CodecError> {
        match <[Value; 2]>::try_from(record.into_values()) {
            Ok([Value::String(message), Value::U32(counter)]) => Ok(Self { message, counter }),
            _ => Err(CodecError::SchemaMismatch {
                schema: Self::SCHEMA.name,
                reason: "expected (string, u32)".to_string(),
            }),
        }
    }
}
