//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std;
use std::fmt::{self, Display};

use serde::de;

pub type Result<T> = std::result::Result<T, Error>;

/// TSON encoding and decoding error.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Constructed from deserialization errors raised outside the core codec.
    Message(String),
    /// The input ended before a required byte or sequence was read.
    Truncated,
    /// The leading byte is in a reserved range or is otherwise unknown.
    InvalidOpcode,
    /// The low 7 bits of a duration unit byte did not match a known unit.
    BadDurationUnit,
    /// A string or key back-reference index was out of range of the current cache.
    BadBackref,
    /// A string or key's bytes were not valid UTF-8.
    BadUtf8,
    /// A float opcode had fewer than the required 4 or 8 payload bytes.
    MalformedFloat,
    /// Encode was asked to emit a non-finite (`NaN` or infinite) float.
    NonFiniteFloat,
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) =>
                formatter.write_str(msg),
            Error::Truncated =>
                formatter.write_str("unexpected end of input"),
            Error::InvalidOpcode =>
                formatter.write_str("reserved or unknown opcode"),
            Error::BadDurationUnit =>
                formatter.write_str("duration unit byte does not name a known unit"),
            Error::BadBackref =>
                formatter.write_str("back-reference index out of range of the cache"),
            Error::BadUtf8 =>
                formatter.write_str("string bytes are not valid utf-8"),
            Error::MalformedFloat =>
                formatter.write_str("float opcode is missing payload bytes"),
            Error::NonFiniteFloat =>
                formatter.write_str("cannot encode a NaN or infinite float"),
        }
    }
}

impl std::error::Error for Error {}
