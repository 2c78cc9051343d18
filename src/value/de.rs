//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use serde::de;

use num_bigint::BigInt;

use std::collections::BTreeMap;
use std::fmt;

use crate::duration::{Duration, DurationUnit};
use crate::value::{magic, LatLon, Timestamp, Value};

/// Deserialization of any serde-compatible input into the TSON value model.
/// This is implemented generically, so substantially any serde data source
/// (not only TSON's own decoder, which builds `Value` directly rather than
/// routing through serde) can be absorbed into a `Value`. Three variants are
/// the exception: `Timestamp`, `Duration` and `LatLon` have no generic serde
/// representation and are only recognized via their magic single-field
/// pseudo-structures (see `value::magic`).
impl<'de> de::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("any valid TSON value")
            }

            #[inline]
            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            #[inline]
            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Int(BigInt::from(value)))
            }

            #[inline]
            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(Value::Int(BigInt::from(value)))
            }

            #[inline]
            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            #[inline]
            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.into()))
            }

            #[inline]
            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            #[inline]
            fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
                Ok(Value::Bytes(value.into()))
            }

            #[inline]
            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Bytes(value))
            }

            #[inline]
            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            #[inline]
            fn visit_seq<V>(self, mut visitor: V) -> Result<Value, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = visitor.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Value, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut map = BTreeMap::<String, Value>::new();

                // The wire-less magic pseudo-structures are identified by a
                // special first key; these never map onto Documents.
                let mut key: Option<String> = visitor.next_key()?;

                if let Some(ref k) = key {
                    if k == magic::timestamp::STRUCT_FIELD {
                        let millis_since_epoch: i64 = visitor.next_value()?;
                        return Ok(Value::Timestamp(Timestamp { millis_since_epoch }));
                    } else if k == magic::duration::STRUCT_FIELD {
                        let (amount, unit_code): (i64, u8) = visitor.next_value()?;
                        let unit = DurationUnit::from_code(unit_code).map_err(de::Error::custom)?;
                        return Ok(Value::Duration(Duration::new(amount, unit)));
                    } else if k == magic::latlon::STRUCT_FIELD {
                        let (latitude, longitude): (f64, f64) = visitor.next_value()?;
                        return Ok(Value::LatLon(LatLon { latitude, longitude }));
                    }
                }

                // Process all key-value pairs checking for duplicates.
                while let Some(k) = key {
                    if map.contains_key(&k) {
                        let msg = format!("duplicate key: `{}`", k);
                        return Err(de::Error::custom(msg));
                    } else {
                        let v = visitor.next_value()?;
                        map.insert(k, v);
                        key = visitor.next_key()?;
                    }
                }

                Ok(Value::Document(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
