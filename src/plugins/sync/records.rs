//! Versioned envelope for typed values.
//!
//! Writes produce `{"version": 1, "data": ...}`. Reads also accept the bare
//! value written before the envelope existed. Anything that fails to decode,
//! or carries a newer version, reads as no data.
//!
//! Lists decode per entry: entries that fail are kept aside as raw JSON so
//! they can be written back untouched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RECORD_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T: ?Sized> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored<T> {
    Versioned { version: u32, data: T },
    Legacy(T),
}

pub fn encode<T: Serialize + ?Sized>(data: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(Envelope {
        version: RECORD_VERSION,
        data,
    })
}

pub fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }

    match serde_json::from_value::<Stored<T>>(value) {
        Ok(Stored::Versioned { version, data }) if version <= RECORD_VERSION => Some(data),
        Ok(Stored::Versioned { version, .. }) => {
            tracing::warn!(target: "sync", key, version, "Ignoring record from a newer version");
            None
        }
        Ok(Stored::Legacy(data)) => Some(data),
        Err(e) => {
            tracing::warn!(target: "sync", key, error = %e, "Ignoring malformed record");
            None
        }
    }
}

/// Outcome of reading a list key.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Absent,
    Found(T),
    /// Present but not a list this version can read. Must not be overwritten.
    Unreadable,
}

/// Decoded entries plus the raw entries that failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRecord<T> {
    pub items: Vec<T>,
    pub rejected: Vec<Value>,
}

impl<T> ListRecord<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.rejected.is_empty()
    }
}

pub fn decode_list<T: DeserializeOwned>(key: &str, value: Value) -> Loaded<ListRecord<T>> {
    if value.is_null() {
        return Loaded::Absent;
    }

    let entries = match serde_json::from_value::<Stored<Vec<Value>>>(value) {
        Ok(Stored::Versioned { version, data }) if version <= RECORD_VERSION => data,
        Ok(Stored::Versioned { version, .. }) => {
            tracing::warn!(target: "sync", key, version, "Ignoring list from a newer version");
            return Loaded::Unreadable;
        }
        Ok(Stored::Legacy(data)) => data,
        Err(e) => {
            tracing::warn!(target: "sync", key, error = %e, "Stored value is not a list");
            return Loaded::Unreadable;
        }
    };

    let mut record = ListRecord {
        items: Vec::with_capacity(entries.len()),
        rejected: Vec::new(),
    };
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => record.items.push(item),
            Err(e) => {
                tracing::warn!(target: "sync", key, index, error = %e, "Keeping undecodable entry as is");
                record.rejected.push(entry);
            }
        }
    }
    Loaded::Found(record)
}

/// Encodes `items` followed by the raw `rejected` entries.
pub fn encode_list<T: Serialize>(items: &[T], rejected: &[Value]) -> Result<Value, serde_json::Error> {
    let mut data = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;
    data.extend(rejected.iter().cloned());
    encode(&data)
}
