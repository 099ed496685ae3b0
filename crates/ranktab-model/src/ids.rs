use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::Deserialize;

use crate::ModelError;

/// Ids below this bound are reserved for control rows and control columns.
pub const RESERVED_ID_LIMIT: u32 = 10;

/// The single reserved-id predicate shared by entities and columns.
pub fn is_reserved_id(id: u32) -> bool {
    id < RESERVED_ID_LIMIT
}

/// Parse a textual id the way every id comparison in the table expects it.
///
/// Surrounding whitespace and leading zeros are ignored, so `" 0101"` and
/// `"101"` name the same row.
fn parse_canonical(raw: &str) -> Result<NonZeroU32, ModelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::InvalidId(raw.to_string()));
    }
    trimmed
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| ModelError::InvalidId(raw.to_string()))
}

fn next_after(max_existing: Option<u32>) -> NonZeroU32 {
    let floor = max_existing
        .unwrap_or(0)
        .max(RESERVED_ID_LIMIT.saturating_sub(1));
    NonZeroU32::MIN.saturating_add(floor)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_nonzero(self) -> Result<NonZeroU32, ModelError> {
        match self {
            RawId::Number(value) => u32::try_from(value)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| ModelError::InvalidId(value.to_string())),
            RawId::Text(text) => parse_canonical(&text),
        }
    }
}

/// Identifier of an entity row (a ranked subject).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(NonZeroU32);

impl EntityId {
    pub fn new(value: u32) -> Result<Self, ModelError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidId(value.to_string()))
    }

    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        parse_canonical(raw).map(Self)
    }

    /// The first id after `max_existing` that is not reserved.
    pub fn next_after(max_existing: Option<EntityId>) -> Self {
        Self(next_after(max_existing.map(EntityId::get)))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn is_reserved(self) -> bool {
        is_reserved_id(self.get())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> serde::Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?
            .into_nonzero()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Identifier of a column (a benchmark or an info field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnId(NonZeroU32);

impl ColumnId {
    pub fn new(value: u32) -> Result<Self, ModelError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidId(value.to_string()))
    }

    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        parse_canonical(raw).map(Self)
    }

    /// The first id after `max_existing` that is not reserved.
    pub fn next_after(max_existing: Option<ColumnId>) -> Self {
        Self(next_after(max_existing.map(ColumnId::get)))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn is_reserved(self) -> bool {
        is_reserved_id(self.get())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColumnId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for ColumnId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> serde::Deserialize<'de> for ColumnId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?
            .into_nonzero()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Identifier of a cell, rendered as `"{entityId}_{columnId}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId {
    pub entity: EntityId,
    pub column: ColumnId,
}

impl CellId {
    pub fn new(entity: EntityId, column: ColumnId) -> Self {
        Self { entity, column }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.entity, self.column)
    }
}

impl FromStr for CellId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (entity, column) = s
            .split_once('_')
            .ok_or_else(|| ModelError::InvalidCellId(s.to_string()))?;
        let entity = EntityId::parse(entity).map_err(|_| ModelError::InvalidCellId(s.to_string()))?;
        let column = ColumnId::parse(column).map_err(|_| ModelError::InvalidCellId(s.to_string()))?;
        Ok(Self { entity, column })
    }
}

impl serde::Serialize for CellId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for CellId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

const USER_ID_MIN_CHARS: usize = 2;
const USER_ID_MAX_CHARS: usize = 50;
const USER_ID_FORBIDDEN: &[char] = &['\t', '\n', '\r', '/', '<', '>', ':', '"', '|', '*', '?', '\\'];

/// Owner of a saved table snapshot.
///
/// Any script is accepted; only whitespace padding, control whitespace and
/// characters that break paths or URLs are rejected.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let chars = value.chars().count();
        let padded = value.trim() != value;
        let too_short = value.trim().chars().count() < USER_ID_MIN_CHARS;
        if padded
            || too_short
            || chars > USER_ID_MAX_CHARS
            || value.contains(USER_ID_FORBIDDEN)
        {
            return Err(ModelError::InvalidUserId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
