//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use serde::de;

use std::fmt;

use crate::value::Timestamp;

/// Name of the Timestamp pseudo-structure.
pub const STRUCT_NAME: &str = "$__tson_private_Timestamp";

/// Name of the single field carrying the millisecond offset.
pub const STRUCT_FIELD: &str = "$__tson_private_Timestamp_millis_since_epoch";

/// Custom deserializer for the Timestamp pseudo-structure.
impl<'de> de::Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct TimestampVisitor;

        impl<'de> de::Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a timestamp")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Timestamp, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let key: Option<FieldKey> = visitor.next_key()?;
                if key.is_none() {
                    return Err(de::Error::custom("timestamp key not found"));
                }
                let millis_since_epoch: i64 = visitor.next_value()?;
                Ok(Timestamp { millis_since_epoch })
            }
        }

        deserializer.deserialize_struct(STRUCT_NAME, &[STRUCT_FIELD], TimestampVisitor)
    }
}

struct FieldKey;

impl<'de> de::Deserialize<'de> for FieldKey {
    fn deserialize<D>(deserializer: D) -> Result<FieldKey, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> de::Visitor<'de> for FieldVisitor {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a valid timestamp field")
            }

            fn visit_str<E>(self, s: &str) -> Result<(), E>
            where
                E: de::Error,
            {
                if s == STRUCT_FIELD {
                    Ok(())
                } else {
                    Err(de::Error::custom("expected field with custom name"))
                }
            }
        }

        deserializer.deserialize_identifier(FieldVisitor)?;
        Ok(FieldKey)
    }
}
