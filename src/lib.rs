//! # cbor-kit
//!
//! A CBOR codec over a small in-memory value model, plus a derive-driven mapper between native
//! Rust types and that model.
//!
//! ## Layers
//!
//! - **Numeric conversion.** [`half_to_f32`] and [`half_to_f64`] widen IEEE half floats at the
//!   bit level.
//! - **Value model.** [`Value`] is a closed enum of every decodable item. Text, byte strings,
//!   arrays and maps are allocated through a [`Context`], which gives each value an identity
//!   scope. [`Context::deep_copy`] is the only way to move a value between contexts.
//! - **Binary codec.** [`Context::parse`] reads the first item of a buffer; [`build`] writes one.
//!   Integer arguments and lengths always use their shortest form, and map order is kept.
//! - **Mapper.** [`ToValue`] and [`FromValue`] convert native values to and from [`Value`].
//!   `#[derive(ToValue, FromValue)]` handles records and kind-tagged unions.
//!
//! ## Wire coverage
//!
//! - Major types 0, 1, 2, 3, 4, 5 and 7, definite length only.
//! - Tags (major type 6) and indefinite-length starts are parse failures.
//! - The break-stop byte `0xff` parses as a one-byte `Undefined`.
//! - Half floats are kept as raw bits and re-emitted verbatim; nothing is narrowed on output.
//!
//! ## Example
//!
//! ```
//! use cbor_kit::{Context, FromValue, ToValue};
//!
//! #[derive(Debug, PartialEq, ToValue, FromValue)]
//! struct Point {
//!     #[cbor(required)]
//!     x: i64,
//!     #[cbor(rename = "label")]
//!     name: String,
//! }
//!
//! let ctx = Context::new();
//! let value = ctx.make(&Point { x: -3, name: "origin".into() });
//! let bytes = cbor_kit::build(&value);
//!
//! let (parsed, used) = ctx.parse(&bytes);
//! assert_eq!(used, bytes.len());
//! let back: Point = cbor_kit::deserialize(&parsed).unwrap();
//! assert_eq!(back, Point { x: -3, name: "origin".into() });
//! ```
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`] and maps `HashMap`.
//! - `sha2` *(default)*: enables [`Value::sha256`].
//! - `serde`: implements `serde::Serialize` for [`Value`].
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation of text items.
//!
//! ## `no_std`
//!
//! Without `std` the crate is `no_std` and needs an allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod coerce;
mod context;
mod encode;
mod error;
mod half;
mod limits;
mod mapper;
mod parse;
#[cfg(feature = "serde")]
mod serde_impl;
mod utf8;
mod value;
mod wire;

pub use crate::coerce::Coerce;
pub use crate::context::{Context, ContextId};
pub use crate::encode::{build, build_into};
pub use crate::error::{CborError, ErrorCode, ErrorKind};
pub use crate::half::{half_to_f32, half_to_f64};
pub use crate::limits::{ParseLimits, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH};
#[doc(hidden)]
pub use crate::mapper::__private;
pub use crate::mapper::{
    deserialize, from_slice, serialize, to_vec, ArrayElem, BinaryConverter, ConverterKind,
    FieldInfo, FromValue, Kind, MapEntries, Record, StringConverter, ToValue, ValueConverter,
    DEFAULT_KIND_KEY,
};
pub use crate::value::{Array, Bytes, Category, Map, Text, Value};

pub use cbor_kit_derive::{FromValue, ToValue};
