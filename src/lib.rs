//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # TSON
//!
//! A native Rust encoder and decoder for TSON, a compact binary interchange
//! format for JSON-shaped data augmented with arbitrary-precision integers,
//! raw byte blobs, timestamps, durations and geographic coordinates.
//!
//! ```
//! use tson::Value;
//!
//! let value = Value::String("hello".to_string());
//! let bytes = tson::encode(&value).unwrap();
//! assert_eq!(tson::decode(&bytes).unwrap(), value);
//! ```

mod decode;
mod duration;
mod encode;
mod error;
mod geohash;
mod opcode;
mod value;
mod varuint;

pub use decode::decode;
pub use encode::encode;
pub use error::{Error, Result};
pub use value::{Array, Document, Duration, DurationUnit, LatLon, Timestamp, Value};
