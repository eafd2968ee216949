//! # Schema Codec
//!
//! Canonical binary encoding of a [`Record`] under a [`Schema`].
//!
//! ## Layout
//!
//! Fields are written in declaration order with no padding:
//! - integers: little-endian, exactly their width
//! - strings: `u32` LE byte length, then the raw UTF-8 bytes

use crate::domain::{CodecError, FieldDef, FieldType, Record, Schema, SchemaRecord, Value};

/// Bytes in a string length prefix.
pub const STRING_PREFIX_LEN: usize = 4;

/// Encode a record under a schema.
pub fn encode(schema: &Schema, record: &Record) -> Result<Vec<u8>, CodecError> {
    let values = record.values();
    if values.len() != schema.fields.len() {
        return Err(CodecError::SchemaMismatch {
            schema: schema.name,
            reason: format!(
                "expected {} fields, got {}",
                schema.fields.len(),
                values.len()
            ),
        });
    }

    let mut out = Vec::with_capacity(encoded_len_hint(values));
    for (field, value) in schema.fields.iter().zip(values) {
        encode_field(schema, field, value, &mut out)?;
    }
    Ok(out)
}

/// Decode a record from the front of `bytes`.
///
/// Bytes past the last field are ignored: account storage may be larger
/// than the record written into it.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Record, CodecError> {
    decode_prefix(schema, bytes).map(|(record, _)| record)
}

/// Decode a record that must occupy `bytes` exactly.
pub fn decode_exact(schema: &Schema, bytes: &[u8]) -> Result<Record, CodecError> {
    let (record, consumed) = decode_prefix(schema, bytes)?;
    if consumed != bytes.len() {
        return Err(CodecError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(record)
}

/// Decode a record and report how many bytes it consumed.
pub fn decode_prefix(schema: &Schema, bytes: &[u8]) -> Result<(Record, usize), CodecError> {
    let mut reader = Reader { bytes, pos: 0 };
    let mut values = Vec::with_capacity(schema.fields.len());
    for field in schema.fields {
        values.push(reader.read_field(field)?);
    }
    Ok((Record::new(values), reader.pos))
}

/// Encoded size of `record`; on the default record this is the canonical
/// minimum storage size for the schema.
pub fn size_of(schema: &Schema, record: &Record) -> Result<usize, CodecError> {
    encode(schema, record).map(|bytes| bytes.len())
}

/// Minimum storage size of a schema (size of its zero-valued instance).
pub fn min_size(schema: &Schema) -> usize {
    schema
        .fields
        .iter()
        .map(|f| f.ty.fixed_width().unwrap_or(STRING_PREFIX_LEN))
        .sum()
}

/// Encode a typed record.
pub fn encode_typed<T: SchemaRecord>(value: &T) -> Result<Vec<u8>, CodecError> {
    encode(&T::SCHEMA, &value.to_record())
}

/// Decode a typed record from the front of `bytes`.
pub fn decode_typed<T: SchemaRecord>(bytes: &[u8]) -> Result<T, CodecError> {
    T::from_record(decode(&T::SCHEMA, bytes)?)
}

fn value_len(value: &Value) -> usize {
    match value {
        Value::String(s) => STRING_PREFIX_LEN + s.len(),
        other => other.field_type().fixed_width().unwrap_or(0),
    }
}

fn encoded_len_hint(values: &[Value]) -> usize {
    values.iter().map(value_len).sum()
}

fn encode_field(
    schema: &Schema,
    field: &FieldDef,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    match (field.ty, value) {
        (FieldType::U8, Value::U8(v)) => out.push(*v),
        (FieldType::U16, Value::U16(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldType::U32, Value::U32(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldType::U64, Value::U64(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldType::U128, Value::U128(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldType::String, Value::String(s)) => {
            let len = u32::try_from(s.len()).map_err(|_| CodecError::SchemaMismatch {
                schema: schema.name,
                reason: format!("string field '{}' longer than u32::MAX bytes", field.name),
            })?;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        (expected, value) => {
            return Err(CodecError::SchemaMismatch {
                schema: schema.name,
                reason: format!(
                    "field '{}' expects {:?}, got {:?}",
                    field.name,
                    expected,
                    value.field_type()
                ),
            })
        }
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, field: &'static str, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.bytes.len() - self.pos;
        if remaining < n {
            return Err(CodecError::Truncated {
                field,
                needed: n,
                remaining,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(field, N)?);
        Ok(buf)
    }

    fn read_field(&mut self, field: &FieldDef) -> Result<Value, CodecError> {
        let name = field.name;
        let value = match field.ty {
            FieldType::U8 => Value::U8(self.take_array::<1>(name)?[0]),
            FieldType::U16 => Value::U16(u16::from_le_bytes(self.take_array(name)?)),
            FieldType::U32 => Value::U32(u32::from_le_bytes(self.take_array(name)?)),
            FieldType::U64 => Value::U64(u64::from_le_bytes(self.take_array(name)?)),
            FieldType::U128 => Value::U128(u128::from_le_bytes(self.take_array(name)?)),
            FieldType::String => {
                let len = u32::from_le_bytes(self.take_array(name)?) as usize;
                let raw = self.take(name, len)?;
                let s = std::str::from_utf8(raw)
                    .map_err(|_| CodecError::InvalidUtf8 { field: name })?;
                Value::String(s.to_owned())
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDef, GreetingAccount};

    const WIDE_FIELDS: &[FieldDef] = &[
        FieldDef::new("tag", FieldType::U8),
        FieldDef::new("port", FieldType::U16),
        FieldDef::new("nonce", FieldType::U64),
        FieldDef::new("supply", FieldType::U128),
        FieldDef::new("label", FieldType::String),
    ];
    const WIDE: Schema = Schema::new("Wide", WIDE_FIELDS);

    #[test]
    fn test_greeting_default_size_is_eight() {
        let schema = GreetingAccount::SCHEMA;
        assert_eq!(size_of(&schema, &schema.default_record()).unwrap(), 8);
        assert_eq!(min_size(&schema), 8);
    }

    #[test]
    fn test_greeting_layout() {
        let bytes = encode_typed(&GreetingAccount::new("hey", 0x0102_0304)).unwrap();
        assert_eq!(
            bytes,
            vec![3, 0, 0, 0, b'h', b'e', b'y', 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_string_prefix_counts_bytes_not_chars() {
        let bytes = encode_typed(&GreetingAccount::new("héllo", 0)).unwrap();
        assert_eq!(&bytes[..4], &6u32.to_le_bytes());
    }

    #[test]
    fn test_greeting_roundtrip() {
        let greeting = GreetingAccount::new("Hello World -- Chuck Norris", 0);
        let bytes = encode_typed(&greeting).unwrap();
        assert_eq!(bytes.len(), 4 + 27 + 4);
        assert_eq!(decode_typed::<GreetingAccount>(&bytes).unwrap(), greeting);
    }

    #[test]
    fn test_wide_schema_roundtrip() {
        let record = Record::new(vec![
            Value::U8(7),
            Value::U16(8080),
            Value::U64(u64::MAX),
            Value::U128(1 << 100),
            Value::String("ünïcode".into()),
        ]);
        let bytes = encode(&WIDE, &record).unwrap();
        assert_eq!(bytes.len(), 1 + 2 + 8 + 16 + 4 + "ünïcode".len());
        assert_eq!(decode_exact(&WIDE, &bytes).unwrap(), record);
        assert_eq!(min_size(&WIDE), 31);
    }

    #[test]
    fn test_roundtrip_across_generated_values() {
        let pieces = ["", "a", "é", "日本", "🦀", "Hello World -- Chuck Norris", "\0"];
        let mut strings: Vec<String> = pieces.iter().map(|s| s.to_string()).collect();
        for a in pieces {
            for b in pieces {
                strings.push(format!("{a}{b}"));
            }
        }
        strings.push("x".repeat(1_000));

        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        for (i, label) in strings.iter().enumerate() {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let edge = i % 3 == 0;
            let record = Record::new(vec![
                Value::U8(if edge { u8::MAX } else { seed as u8 }),
                Value::U16(if edge { 0 } else { (seed >> 8) as u16 }),
                Value::U64(if edge { u64::MAX } else { seed }),
                Value::U128(((seed as u128) << 64) | i as u128),
                Value::String(label.clone()),
            ]);

            let bytes = encode(&WIDE, &record).unwrap();
            assert_eq!(bytes.len(), size_of(&WIDE, &record).unwrap());
            assert_eq!(bytes.len(), min_size(&WIDE) + label.len());
            assert_eq!(decode_exact(&WIDE, &bytes).unwrap(), record, "label {label:?}");

            let greeting = GreetingAccount::new(label.as_str(), seed as u32);
            let bytes = encode_typed(&greeting).unwrap();
            assert_eq!(decode_typed::<GreetingAccount>(&bytes).unwrap(), greeting);
        }
    }

    #[test]
    fn test_decode_ignores_storage_padding() {
        let greeting = GreetingAccount::new("pad", 1);
        let mut bytes = encode_typed(&greeting).unwrap();
        bytes.extend_from_slice(&[0u8; 16]);
        assert_eq!(decode_typed::<GreetingAccount>(&bytes).unwrap(), greeting);
        assert_eq!(
            decode_exact(&GreetingAccount::SCHEMA, &bytes),
            Err(CodecError::TrailingBytes(16))
        );
    }

    #[test]
    fn test_decode_short_buffer_is_truncated() {
        let schema = GreetingAccount::SCHEMA;
        for len in 0..8 {
            let bytes = vec![0u8; len];
            assert!(
                matches!(decode(&schema, &bytes), Err(CodecError::Truncated { .. })),
                "len {len} should be truncated"
            );
        }
    }

    #[test]
    fn test_decode_oversized_prefix_is_truncated() {
        let mut bytes = u32::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        assert_eq!(
            decode(&GreetingAccount::SCHEMA, &bytes),
            Err(CodecError::Truncated {
                field: "message",
                needed: u32::MAX as usize,
                remaining: 3,
            })
        );
    }

    #[test]
    fn test_decode_missing_counter_is_truncated() {
        let bytes = encode_typed(&GreetingAccount::new("abc", 9)).unwrap();
        let err = decode(&GreetingAccount::SCHEMA, &bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                field: "counter",
                needed: 4,
                remaining: 3,
            }
        );
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut bytes = 2u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(
            decode(&GreetingAccount::SCHEMA, &bytes),
            Err(CodecError::InvalidUtf8 { field: "message" })
        );
    }

    #[test]
    fn test_encode_rejects_wrong_value_type() {
        let record = Record::new(vec![Value::U32(1), Value::U32(2)]);
        assert!(matches!(
            encode(&GreetingAccount::SCHEMA, &record),
            Err(CodecError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_wrong_field_count() {
        let record = Record::new(vec![Value::String("x".into())]);
        assert!(matches!(
            encode(&GreetingAccount::SCHEMA, &record),
            Err(CodecError::SchemaMismatch { .. })
        ));
    }
}
