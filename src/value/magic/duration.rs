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

use crate::duration::{Duration, DurationUnit};

/// Name of the Duration pseudo-structure.
pub const STRUCT_NAME: &str = "$__tson_private_Duration";

/// Name of the single field carrying the `(amount, unit code)` pair.
pub const STRUCT_FIELD: &str = "$__tson_private_Duration_amount_and_unit_code";

/// Custom deserializer for the Duration pseudo-structure.
impl<'de> de::Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> de::Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a duration")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Duration, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let key: Option<FieldKey> = visitor.next_key()?;
                if key.is_none() {
                    return Err(de::Error::custom("duration key not found"));
                }
                let (amount, unit_code): (i64, u8) = visitor.next_value()?;
                let unit = DurationUnit::from_code(unit_code).map_err(de::Error::custom)?;
                Ok(Duration::new(amount, unit))
            }
        }

        deserializer.deserialize_struct(STRUCT_NAME, &[STRUCT_FIELD], DurationVisitor)
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
                formatter.write_str("a valid duration field")
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
