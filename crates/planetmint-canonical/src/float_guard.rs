//! A `serde::Serializer` that walks a value and fails on the first float.
//!
//! Converting typed data with `serde_json::to_value` maps NaN and the
//! infinities to `null`, which would make two different caller values hash
//! the same. Running this probe first turns that into an error.

use std::fmt;

use serde::ser::{self, Serialize, Serializer};

use crate::canonicalizer::{CanonicalizationError, Path};

/// Fails if `value` contains an `f32` or `f64` anywhere in its structure.
pub fn reject_floats<T: Serialize + ?Sized>(value: &T) -> Result<(), CanonicalizationError> {
    value
        .serialize(FloatProbe { path: Path::root() })
        .map_err(|ProbeError(inner)| inner)
}

#[derive(Debug)]
struct ProbeError(CanonicalizationError);

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ProbeError {}

impl ser::Error for ProbeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ProbeError(CanonicalizationError::Serialization(msg.to_string()))
    }
}

struct FloatProbe {
    path: Path,
}

impl FloatProbe {
    fn float(self, value: f64) -> Result<(), ProbeError> {
        let at = self.path.to_string();
        Err(ProbeError(if value.is_finite() {
            CanonicalizationError::FloatNumber(at)
        } else {
            CanonicalizationError::NonFiniteNumber(at)
        }))
    }
}

macro_rules! accept {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<(), ProbeError> {
                Ok(())
            }
        )*
    };
}

impl Serializer for FloatProbe {
    type Ok = ();
    type Error = ProbeError;
    type SerializeSeq = SeqProbe;
    type SerializeTuple = SeqProbe;
    type SerializeTupleStruct = SeqProbe;
    type SerializeTupleVariant = SeqProbe;
    type SerializeMap = MapProbe;
    type SerializeStruct = StructProbe;
    type SerializeStructVariant = StructProbe;

    accept!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> Result<(), ProbeError> {
        self.float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), ProbeError> {
        self.float(v)
    }

    fn serialize_none(self) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), ProbeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(FloatProbe {
            path: self.path.push_field(variant),
        })
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SeqProbe, ProbeError> {
        Ok(SeqProbe {
            path: self.path,
            index: 0,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqProbe, ProbeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqProbe, ProbeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SeqProbe, ProbeError> {
        Ok(SeqProbe {
            path: self.path.push_field(variant),
            index: 0,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapProbe, ProbeError> {
        Ok(MapProbe {
            path: self.path,
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<StructProbe, ProbeError> {
        Ok(StructProbe { path: self.path })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<StructProbe, ProbeError> {
        Ok(StructProbe {
            path: self.path.push_field(variant),
        })
    }
}

struct SeqProbe {
    path: Path,
    index: usize,
}

impl SeqProbe {
    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        let path = self.path.push_index(self.index);
        self.index += 1;
        value.serialize(FloatProbe { path })
    }
}

impl ser::SerializeSeq for SeqProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        self.element(value)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeTuple for SeqProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        self.element(value)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for SeqProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        self.element(value)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for SeqProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        self.element(value)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

struct MapProbe {
    path: Path,
    key: Option<String>,
}

impl ser::SerializeMap for MapProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), ProbeError> {
        key.serialize(FloatProbe {
            path: self.path.push_field("<key>"),
        })?;
        self.key = match serde_json::to_value(key) {
            Ok(serde_json::Value::String(s)) => Some(s),
            _ => None,
        };
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        let field = self.key.take().unwrap_or_else(|| "<value>".to_string());
        value.serialize(FloatProbe {
            path: self.path.push_field(&field),
        })
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

struct StructProbe {
    path: Path,
}

impl ser::SerializeStruct for StructProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(FloatProbe {
            path: self.path.push_field(key),
        })
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for StructProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(FloatProbe {
            path: self.path.push_field(key),
        })
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(serde::Serialize)]
    struct Reading {
        sensor: String,
        samples: Vec<Sample>,
    }

    #[derive(serde::Serialize)]
    struct Sample {
        at: u64,
        value: f32,
    }

    #[test]
    fn integers_strings_and_nested_maps_pass() {
        let mut tags = BTreeMap::new();
        tags.insert("site", vec![1u8, 2, 3]);
        assert!(reject_floats(&tags).is_ok());
        assert!(reject_floats(&json!({"a": [1, "two", null, {"b": -3}]})).is_ok());
        assert!(reject_floats(&Some("x")).is_ok());
    }

    #[test]
    fn reports_path_of_nested_float() {
        let reading = Reading {
            sensor: "t1".into(),
            samples: vec![
                Sample { at: 1, value: 0.0 },
                Sample {
                    at: 2,
                    value: f32::INFINITY,
                },
            ],
        };
        match reject_floats(&reading).unwrap_err() {
            CanonicalizationError::FloatNumber(path) => assert_eq!(path, "samples.[0].value"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_is_distinguished() {
        let mut map = BTreeMap::new();
        map.insert("temp".to_string(), f64::NAN);
        match reject_floats(&map).unwrap_err() {
            CanonicalizationError::NonFiniteNumber(path) => assert_eq!(path, "temp"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
