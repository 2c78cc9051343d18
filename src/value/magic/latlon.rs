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

use crate::value::LatLon;

/// Name of the LatLon pseudo-structure.
pub const STRUCT_NAME: &str = "$__tson_private_LatLon";

/// Name of the single field carrying the `(latitude, longitude)` pair.
pub const STRUCT_FIELD: &str = "$__tson_private_LatLon_lat_and_lon";

/// Custom deserializer for the LatLon pseudo-structure.
impl<'de> de::Deserialize<'de> for LatLon {
    fn deserialize<D>(deserializer: D) -> Result<LatLon, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct LatLonVisitor;

        impl<'de> de::Visitor<'de> for LatLonVisitor {
            type Value = LatLon;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a latitude/longitude pair")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<LatLon, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let key: Option<FieldKey> = visitor.next_key()?;
                if key.is_none() {
                    return Err(de::Error::custom("lat/lon key not found"));
                }
                let (latitude, longitude): (f64, f64) = visitor.next_value()?;
                Ok(LatLon { latitude, longitude })
            }
        }

        deserializer.deserialize_struct(STRUCT_NAME, &[STRUCT_FIELD], LatLonVisitor)
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
                formatter.write_str("a valid lat/lon field")
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
