//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The TSON encoder.
//!
//! A recursive walk over a [`Value`] tree producing a byte sequence. Owns
//! two memoization maps — one for string payloads, one for document key
//! names — which flow through the entire recursive encode of a single
//! top-level value and are discarded once it completes.

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geohash;
use crate::opcode;
use crate::value::Value;
use crate::varuint;

/// Encodes `value` into its TSON wire representation.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new();
    encoder.encode_value(value)
}

/// Owns the string and key back-reference caches for one top-level encode.
struct Encoder {
    /// Maps a string payload to the back-reference index it was first seen at.
    string_cache: HashMap<String, usize>,
    /// Maps a document key name to the back-reference index it was first seen at.
    key_cache: HashMap<String, usize>,
}

impl Encoder {
    fn new() -> Self {
        Encoder {
            string_cache: HashMap::new(),
            key_cache: HashMap::new(),
        }
    }

    fn encode_value(&mut self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Null => Ok(vec![opcode::NULL]),
            Value::Bool(true) => Ok(vec![opcode::TRUE]),
            Value::Bool(false) => Ok(vec![opcode::FALSE]),
            Value::Int(n) => Ok(encode_int(n)),
            Value::Float(x) => self.encode_float(*x),
            Value::Bytes(bytes) => Ok(encode_bytes(bytes)),
            Value::String(s) => Ok(self.encode_string(s)),
            Value::Array(elements) => self.encode_array(elements),
            Value::Document(entries) => self.encode_document(entries),
            Value::Timestamp(timestamp) => Ok(encode_timestamp(timestamp)),
            Value::Duration(duration) => Ok(encode_duration(duration)),
            Value::LatLon(lat_lon) => Ok(encode_lat_lon(lat_lon)),
        }
    }

    fn encode_float(&mut self, x: f64) -> Result<Vec<u8>> {
        if !x.is_finite() {
            return Err(Error::NonFiniteFloat);
        }

        // An integral float collapses to its Int encoding regardless of
        // rounding rule: round-half-to-even and x agree whenever x already
        // has no fractional part, which is the only case `r == x` can hold.
        if x.fract() == 0.0 {
            let as_int = bigint_from_integral_f64(x).ok_or(Error::MalformedFloat)?;
            return Ok(encode_int(&as_int));
        }

        let single = x as f32;
        if f64::from(single) == x {
            let mut out = vec![opcode::FLOAT4];
            out.extend_from_slice(&single.to_le_bytes());
            Ok(out)
        } else {
            let mut out = vec![opcode::FLOAT8];
            out.extend_from_slice(&x.to_le_bytes());
            Ok(out)
        }
    }

    fn encode_string(&mut self, s: &str) -> Vec<u8> {
        if let Some(&index) = self.string_cache.get(s) {
            let mut out = vec![opcode::STRING_BACKREF];
            varuint::encode_u64(index as u64, &mut out);
            return out;
        }

        let index = self.string_cache.len();
        self.string_cache.insert(s.to_string(), index);

        let bytes = s.as_bytes();
        let mut out = Vec::with_capacity(bytes.len() + 2);
        if bytes.len() >= 1 && bytes.len() <= 24 {
            out.push(opcode::SMALL_STRING_BASE + bytes.len() as u8);
            out.extend_from_slice(bytes);
        } else {
            out.push(opcode::STRING_TERMINATED);
            out.extend_from_slice(bytes);
            out.push(0x00);
        }
        out
    }

    fn encode_array(&mut self, elements: &[Value]) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        for element in elements {
            body.extend_from_slice(&self.encode_value(element)?);
        }

        let mut out = Vec::new();
        if elements.len() >= 1 && elements.len() <= 4 {
            out.push(opcode::SMALL_ARRAY_BASE + elements.len() as u8);
            out.extend_from_slice(&body);
        } else {
            out.push(opcode::ARRAY);
            out.extend_from_slice(&body);
            out.push(0x00);
        }
        Ok(out)
    }

    /// Encodes a Document's entries in the ascending key order the
    /// `BTreeMap` already iterates in, applying the stolen-bit trick
    /// (section 4.5.1) to each entry.
    fn encode_document(&mut self, entries: &std::collections::BTreeMap<String, Value>) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        for (key, value) in entries {
            self.encode_document_entry(key, value, &mut body)?;
        }

        let mut out = Vec::new();
        if entries.len() >= 1 && entries.len() <= 4 {
            out.push(opcode::SMALL_DOCUMENT_BASE + entries.len() as u8);
            out.extend_from_slice(&body);
        } else {
            out.push(opcode::DOCUMENT);
            out.extend_from_slice(&body);
            out.push(0x00);
        }
        Ok(out)
    }

    /// Encodes one `(key, value)` entry, stealing the high bit of the
    /// value's first opcode byte to flag a back-referenced key. Legitimate
    /// opcodes are all `<= 0x7F`, so that bit is always zero on emit and is
    /// safe to repurpose.
    fn encode_document_entry(&mut self, key: &str, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let mut encoded_value = self.encode_value(value)?;

        if let Some(&index) = self.key_cache.get(key) {
            encoded_value[0] |= opcode::KEY_IS_BACKREF_FLAG;
            out.extend_from_slice(&encoded_value);
            varuint::encode_u64(index as u64, out);
        } else {
            let index = self.key_cache.len();
            self.key_cache.insert(key.to_string(), index);
            out.extend_from_slice(&encoded_value);
            out.extend_from_slice(key.as_bytes());
            out.push(0x00);
        }
        Ok(())
    }
}

/// Converts an integral `f64` (one with `x.fract() == 0.0`) to a `BigInt`
/// without going through a fixed-width intermediate that could overflow.
fn bigint_from_integral_f64(x: f64) -> Option<BigInt> {
    use num_traits::FromPrimitive;
    BigInt::from_f64(x)
}

fn encode_int(n: &BigInt) -> Vec<u8> {
    if n.sign() != Sign::Minus {
        if let Some(small) = n.to_u64() {
            if small <= 63 {
                return vec![opcode::SMALL_INT_BASE + small as u8];
            }
        }
        let mut out = vec![opcode::INT_POSITIVE];
        varuint::encode(n.magnitude(), &mut out);
        out
    } else {
        let mut out = vec![opcode::INT_NEGATIVE];
        varuint::encode(n.magnitude(), &mut out);
        out
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![opcode::BYTES];
    varuint::encode_u64(bytes.len() as u64, &mut out);
    out.extend_from_slice(bytes);
    out
}

fn encode_timestamp(timestamp: &crate::value::Timestamp) -> Vec<u8> {
    let delta = timestamp.millis_since_epoch;
    let mut out = Vec::new();
    if delta >= 0 {
        out.push(opcode::TIMESTAMP_POSITIVE);
        varuint::encode_u64(delta as u64, &mut out);
    } else {
        out.push(opcode::TIMESTAMP_NEGATIVE);
        varuint::encode_u64(delta.unsigned_abs(), &mut out);
    }
    out
}

fn encode_duration(duration: &crate::duration::Duration) -> Vec<u8> {
    let canonical = duration.canonicalize();
    let sign_flag = if canonical.amount < 0 { opcode::DURATION_NEGATIVE_FLAG } else { 0 };
    let mut out = vec![opcode::DURATION, sign_flag | canonical.unit.code()];
    varuint::encode_u64(canonical.amount.unsigned_abs(), &mut out);
    out
}

fn encode_lat_lon(lat_lon: &crate::value::LatLon) -> Vec<u8> {
    let hash = geohash::encode(lat_lon.latitude, lat_lon.longitude);
    let mut out = vec![opcode::LAT_LON];
    varuint::encode_u64(hash, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Document, Value};

    #[test]
    fn test_small_int_boundary() {
        assert_eq!(encode(&Value::int(0u64)).unwrap(), vec![0x40]);
        assert_eq!(encode(&Value::int(63u64)).unwrap(), vec![0x7F]);
        assert_eq!(encode(&Value::int(64u64)).unwrap(), vec![0x3A, 0x40]);
    }

    #[test]
    fn test_negative_int() {
        assert_eq!(encode(&Value::int(-2000)).unwrap(), vec![0x3B, 0xD0, 0x0F]);
    }

    #[test]
    fn test_whole_float_collapses_to_int() {
        assert_eq!(encode(&Value::Float(200.0)).unwrap(), encode(&Value::int(200u64)).unwrap());
        assert_eq!(encode(&Value::Float(-6789.0)).unwrap(), vec![0x3B, 0x85, 0x35]);
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        assert_eq!(encode(&Value::Float(f64::NAN)), Err(Error::NonFiniteFloat));
        assert_eq!(encode(&Value::Float(f64::INFINITY)), Err(Error::NonFiniteFloat));
    }

    #[test]
    fn test_string_memoization_emits_backref_on_repeat() {
        let value = Value::Array(vec![
            Value::String("kitty".to_string()),
            Value::String("kitty".to_string()),
        ]);
        let bytes = encode(&value).unwrap();
        // Small array of 2: 0x2B + 2, then "kitty" inline, then a backref to index 0.
        assert_eq!(bytes, vec![0x2D, 0x14, b'k', b'i', b't', b't', b'y', 0x0F, 0x00]);
    }

    #[test]
    fn test_document_entry_steals_high_bit_for_repeated_key() {
        let mut inner_a = Document::new();
        inner_a.insert("name".to_string(), Value::Null);
        let mut inner_b = Document::new();
        inner_b.insert("name".to_string(), Value::Null);

        let bytes = encode(&Value::Array(vec![Value::Document(inner_a), Value::Document(inner_b)])).unwrap();
        // Second occurrence's entry: Null opcode 0x07 with the high bit stolen -> 0x87,
        // followed by the key backref index.
        assert!(bytes.windows(2).any(|w| w == [0x87, 0x00]));
    }

    #[test]
    fn test_small_vs_large_document_form() {
        let mut small = Document::new();
        small.insert("1".to_string(), Value::Null);
        assert_eq!(encode(&Value::Document(small)).unwrap(), vec![0x28, 0x07, b'1', 0x00]);
    }
}
