use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SharedError;

/// Integer on the wire; numeric strings are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Text(String),
}

impl RawInt {
    fn into_i64(self) -> Option<i64> {
        match self {
            RawInt::Int(n) => Some(n),
            RawInt::Text(s) => s.trim().parse().ok(),
        }
    }
}

macro_rules! wire_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = SharedError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map($name)
                    .map_err(|_| SharedError::InvalidId {
                        kind: $what,
                        value: s.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawInt::deserialize(deserializer)?
                    .into_i64()
                    .map($name)
                    .ok_or_else(|| serde::de::Error::custom(concat!("invalid ", $what)))
            }
        }
    };
}

wire_id!(
    /// Server-assigned note identifier. Stable for the lifetime of the note.
    NoteId,
    "note id"
);

wire_id!(
    /// Server-assigned draft identifier, unknown until the first save.
    DraftId,
    "draft id"
);

/// Visibility tier of a note.
///
/// Codes 0–3 are the known tiers. Any other integer is kept as
/// [`PublicRange::Unrecognized`] so it can be displayed ("Unknown") and
/// written back without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicRange {
    Private,
    FollowersOnly,
    Unlisted,
    Public,
    Unrecognized(i64),
}

impl PublicRange {
    /// The selectable tiers, in code order.
    pub const KNOWN: [PublicRange; 4] = [
        PublicRange::Private,
        PublicRange::FollowersOnly,
        PublicRange::Unlisted,
        PublicRange::Public,
    ];

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Private,
            1 => Self::FollowersOnly,
            2 => Self::Unlisted,
            3 => Self::Public,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Private => 0,
            Self::FollowersOnly => 1,
            Self::Unlisted => 2,
            Self::Public => 3,
            Self::Unrecognized(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Private => "Private",
            Self::FollowersOnly => "Followers Only",
            Self::Unlisted => "Unlisted",
            Self::Public => "Public",
            Self::Unrecognized(_) => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Default for PublicRange {
    fn default() -> Self {
        Self::Public
    }
}

impl fmt::Display for PublicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PublicRange {
    type Err = SharedError;

    /// Accepts a numeric code or a label (case-insensitive, `-`/`_` for spaces).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Ok(Self::from_code(code));
        }
        let normalized = s.to_ascii_lowercase().replace(['-', '_'], " ");
        Self::KNOWN
            .into_iter()
            .find(|r| r.label().to_ascii_lowercase() == normalized)
            .ok_or_else(|| SharedError::InvalidPublicRange(s.to_string()))
    }
}

/// Written as a decimal string (`"3"`); the collaborator only accepts the
/// quoted form.
impl Serialize for PublicRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for PublicRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawInt::deserialize(deserializer)?
            .into_i64()
            .map(Self::from_code)
            .ok_or_else(|| serde::de::Error::custom("invalid public_range"))
    }
}

/// Lenient reader for `public_range` fields of server records.
///
/// A missing, null or non-numeric value becomes `None` instead of failing
/// the whole record.
pub(crate) fn lenient_public_range<'de, D>(deserializer: D) -> Result<Option<PublicRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(public_range_from_value))
}

pub(crate) fn public_range_from_value(value: &serde_json::Value) -> Option<PublicRange> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().map(PublicRange::from_code),
        serde_json::Value::String(s) => s.trim().parse().ok().map(PublicRange::from_code),
        _ => None,
    }
}
