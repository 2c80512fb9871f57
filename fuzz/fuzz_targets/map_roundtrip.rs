#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;

use cbor_kit::{from_slice, to_vec, FromValue, ToValue};

#[derive(Debug, PartialEq, ToValue, FromValue)]
struct Item {
    id: u32,
    #[cbor(rename = "n")]
    name: Option<String>,
    blob: Vec<u8>,
}

#[derive(Debug, PartialEq, ToValue, FromValue)]
enum Entry {
    Flag(bool),
    Count(i64),
    Label(String),
    Items(Vec<Item>),
}

#[derive(Debug, PartialEq, ToValue, FromValue)]
struct Doc {
    #[cbor(required)]
    version: u16,
    entries: Vec<Entry>,
    attrs: BTreeMap<String, i32>,
}

fuzz_target!(|data: &[u8]| {
    // Anything the mapper accepts must survive a native roundtrip unchanged.
    if let Ok(doc) = from_slice::<Doc>(data) {
        let bytes = to_vec(&doc);
        let back: Doc = from_slice(&bytes).expect("re-decode");
        assert_eq!(back, doc);
    }
});
