use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a technology record.
///
/// Ids are positive integers up to [`RecordId::MAX`] handed out by the record
/// store. `0` is reserved for imported entries that arrived without a usable
/// id; the store replaces it with a fresh one before the entry joins the
/// canonical collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const UNASSIGNED: RecordId = RecordId(0);

    /// Largest id that survives a round trip through a JSON number in a browser.
    pub const MAX: RecordId = RecordId((1 << 53) - 1);

    pub fn new(value: u64) -> Self {
        RecordId(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// The id directly after this one, or None once `MAX` is reached.
    pub fn next(self) -> Option<RecordId> {
        if self >= RecordId::MAX {
            return None;
        }
        self.0.checked_add(1).map(RecordId)
    }

    fn decoded(value: u64) -> RecordId {
        if value > RecordId::MAX.0 {
            RecordId::UNASSIGNED
        } else {
            RecordId(value)
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Stored and exported collections carry ids as numbers, numeric strings, or not
// at all. Anything that is not a positive integer up to MAX decodes as UNASSIGNED.
impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

struct RecordIdVisitor;

impl<'de> Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a positive integer or numeric string id")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<RecordId, E> {
        Ok(RecordId::decoded(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<RecordId, E> {
        Ok(u64::try_from(value)
            .map(RecordId::decoded)
            .unwrap_or(RecordId::UNASSIGNED))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<RecordId, E> {
        if value.fract() == 0.0 && value >= 1.0 && value <= RecordId::MAX.0 as f64 {
            Ok(RecordId(value as u64))
        } else {
            Ok(RecordId::UNASSIGNED)
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<RecordId, E> {
        Ok(value
            .trim()
            .parse::<u64>()
            .map(RecordId::decoded)
            .unwrap_or(RecordId::UNASSIGNED))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RecordId, E> {
        Ok(RecordId::UNASSIGNED)
    }

    fn visit_none<E: de::Error>(self) -> Result<RecordId, E> {
        Ok(RecordId::UNASSIGNED)
    }
}
