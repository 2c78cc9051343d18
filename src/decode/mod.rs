//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The TSON decoder.
//!
//! A recursive descent over an opcode stream, mirroring [`crate::encode`]
//! byte for byte. Owns the same two back-reference caches as the encoder,
//! populated in the same order a matching encode would have assigned them,
//! so a back-reference index always lands on the same string or key.

mod parser;

use num_bigint::{BigInt, Sign};
use std::collections::BTreeMap;

use crate::duration::{Duration, DurationUnit};
use crate::error::{Error, Result};
use crate::geohash;
use crate::opcode;
use crate::value::{LatLon, Timestamp, Value};
use crate::varuint;

use parser::{peek_byte, take_byte, take_cstring, take_fixed_string, take_n, varuint_u64};

/// Decodes a single TSON value from `bytes`.
///
/// The entire input must be consumed by the one top-level value; trailing
/// bytes are a decode error rather than being silently ignored.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let mut decoder = Decoder::new();
    let (rest, value) = decoder.parse_value(bytes)?;
    if !rest.is_empty() {
        return Err(Error::Message("trailing bytes after top-level value".to_string()));
    }
    Ok(value)
}

struct Decoder {
    string_cache: Vec<String>,
    key_cache: Vec<String>,
}

impl Decoder {
    fn new() -> Self {
        Decoder {
            string_cache: Vec::new(),
            key_cache: Vec::new(),
        }
    }

    fn parse_value<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, raw_opcode) = take_byte(input)?;
        self.parse_value_with_opcode(raw_opcode, rest)
    }

    fn parse_value_with_opcode<'a>(&mut self, op: u8, rest: &'a [u8]) -> Result<(&'a [u8], Value)> {
        match op {
            opcode::NULL => Ok((rest, Value::Null)),
            opcode::TRUE => Ok((rest, Value::Bool(true))),
            opcode::FALSE => Ok((rest, Value::Bool(false))),
            opcode::BYTES => self.parse_bytes(rest),
            opcode::TIMESTAMP_POSITIVE => self.parse_timestamp(rest, 1),
            opcode::TIMESTAMP_NEGATIVE => self.parse_timestamp(rest, -1),
            opcode::LAT_LON => self.parse_lat_lon(rest),
            opcode::DOCUMENT => self.parse_document(rest, None),
            opcode::ARRAY => self.parse_array(rest, None),
            opcode::STRING_TERMINATED => self.parse_terminated_string(rest),
            opcode::STRING_BACKREF => self.parse_string_backref(rest),
            opcode::DURATION => self.parse_duration(rest),
            opcode::INT_POSITIVE => self.parse_int(rest, Sign::Plus),
            opcode::INT_NEGATIVE => self.parse_int(rest, Sign::Minus),
            opcode::FLOAT4 => self.parse_float4(rest),
            opcode::FLOAT8 => self.parse_float8(rest),
            _ if opcode::is_small_string(op) => {
                self.parse_small_string(rest, (op - opcode::SMALL_STRING_BASE) as usize)
            }
            _ if opcode::is_small_document(op) => {
                self.parse_document(rest, Some((op - opcode::SMALL_DOCUMENT_BASE) as usize))
            }
            _ if opcode::is_small_array(op) => {
                self.parse_array(rest, Some((op - opcode::SMALL_ARRAY_BASE) as usize))
            }
            _ if opcode::is_small_int(op) => Ok((rest, Value::int((op - opcode::SMALL_INT_BASE) as u64))),
            _ => Err(Error::InvalidOpcode),
        }
    }

    fn parse_bytes<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, len) = varuint_u64(input)?;
        let (rest, bytes) = take_n(rest, len as usize)?;
        Ok((rest, Value::Bytes(bytes.to_vec())))
    }

    fn parse_small_string<'a>(&mut self, input: &'a [u8], len: usize) -> Result<(&'a [u8], Value)> {
        let (rest, s) = take_fixed_string(input, len)?;
        self.string_cache.push(s.clone());
        Ok((rest, Value::String(s)))
    }

    fn parse_terminated_string<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, s) = take_cstring(input)?;
        self.string_cache.push(s.clone());
        Ok((rest, Value::String(s)))
    }

    fn parse_string_backref<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, index) = varuint_u64(input)?;
        let s = self
            .string_cache
            .get(index as usize)
            .cloned()
            .ok_or(Error::BadBackref)?;
        Ok((rest, Value::String(s)))
    }

    fn parse_array<'a>(&mut self, input: &'a [u8], count: Option<usize>) -> Result<(&'a [u8], Value)> {
        let mut elements = Vec::new();
        let mut cursor = input;
        match count {
            Some(n) => {
                for _ in 0..n {
                    let (rest, value) = self.parse_value(cursor)?;
                    elements.push(value);
                    cursor = rest;
                }
            }
            None => loop {
                if peek_byte(cursor)? == 0x00 {
                    cursor = &cursor[1..];
                    break;
                }
                let (rest, value) = self.parse_value(cursor)?;
                elements.push(value);
                cursor = rest;
            },
        }
        Ok((cursor, Value::Array(elements)))
    }

    fn parse_document<'a>(&mut self, input: &'a [u8], count: Option<usize>) -> Result<(&'a [u8], Value)> {
        let mut entries = BTreeMap::new();
        let mut cursor = input;
        match count {
            Some(n) => {
                for _ in 0..n {
                    let (rest, (key, value)) = self.parse_document_entry(cursor)?;
                    entries.insert(key, value);
                    cursor = rest;
                }
            }
            None => loop {
                if peek_byte(cursor)? == 0x00 {
                    cursor = &cursor[1..];
                    break;
                }
                let (rest, (key, value)) = self.parse_document_entry(cursor)?;
                entries.insert(key, value);
                cursor = rest;
            },
        }
        Ok((cursor, Value::Document(entries)))
    }

    /// Parses one `(key, value)` entry, unmasking the stolen high bit on the
    /// value's opcode byte to learn whether the key follows as an inline
    /// terminated string or as a back-reference index.
    fn parse_document_entry<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], (String, Value))> {
        let (rest, raw_opcode) = take_byte(input)?;
        let is_key_backref = raw_opcode & opcode::KEY_IS_BACKREF_FLAG != 0;
        let real_opcode = raw_opcode & !opcode::KEY_IS_BACKREF_FLAG;
        let (rest, value) = self.parse_value_with_opcode(real_opcode, rest)?;

        if is_key_backref {
            let (rest, index) = varuint_u64(rest)?;
            let key = self
                .key_cache
                .get(index as usize)
                .cloned()
                .ok_or(Error::BadBackref)?;
            Ok((rest, (key, value)))
        } else {
            let (rest, key) = take_cstring(rest)?;
            self.key_cache.push(key.clone());
            Ok((rest, (key, value)))
        }
    }

    fn parse_int<'a>(&mut self, input: &'a [u8], sign: Sign) -> Result<(&'a [u8], Value)> {
        let (rest, magnitude) = varuint::decode(input).map_err(|_| Error::Truncated)?;
        Ok((rest, Value::Int(BigInt::from_biguint(sign, magnitude))))
    }

    fn parse_float4<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, bytes) = take_n(input, 4).map_err(|_| Error::MalformedFloat)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok((rest, Value::Float(f32::from_le_bytes(buf) as f64)))
    }

    fn parse_float8<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, bytes) = take_n(input, 8).map_err(|_| Error::MalformedFloat)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok((rest, Value::Float(f64::from_le_bytes(buf))))
    }

    fn parse_timestamp<'a>(&mut self, input: &'a [u8], sign: i64) -> Result<(&'a [u8], Value)> {
        let (rest, magnitude) = varuint_u64(input)?;
        let millis_since_epoch = sign * magnitude as i64;
        Ok((rest, Value::Timestamp(Timestamp { millis_since_epoch })))
    }

    fn parse_duration<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, unit_byte) = take_byte(input)?;
        let is_negative = unit_byte & opcode::DURATION_NEGATIVE_FLAG != 0;
        let unit_code = unit_byte & !opcode::DURATION_NEGATIVE_FLAG;
        let unit = DurationUnit::from_code(unit_code)?;
        let (rest, magnitude) = varuint_u64(rest)?;
        let amount = if is_negative { -(magnitude as i64) } else { magnitude as i64 };
        Ok((rest, Value::Duration(Duration::new(amount, unit))))
    }

    fn parse_lat_lon<'a>(&mut self, input: &'a [u8]) -> Result<(&'a [u8], Value)> {
        let (rest, hash) = varuint_u64(input)?;
        let (latitude, longitude) = geohash::decode(hash);
        Ok((rest, Value::LatLon(LatLon { latitude, longitude })))
    }
}
