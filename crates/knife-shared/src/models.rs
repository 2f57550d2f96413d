//! Records owned by the collaborator, as they travel over the wire.
//!
//! The client only ever holds render-lifetime copies of these. [`Note`] is
//! read from a response and written back whole in a read-modify-write
//! update, so it carries what it needs to reproduce the record it came from.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{lenient_public_range, public_range_from_value, DraftId, NoteId, PublicRange};

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A published note.
///
/// Serialization writes back every known key the record arrived with, in
/// its original form where the value is unchanged, plus the keys of
/// [`Note::extra`]. Known keys that were absent are only written once they
/// hold something.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub author_name: String,
    /// Federated handle of the author, without the leading `@`.
    pub author_finger: String,
    /// Trusted HTML fragment. Inserted into markup verbatim.
    pub content: String,
    /// Content warning label. Empty counts as absent.
    pub cw: Option<String>,
    pub public_range: Option<PublicRange>,
    pub category: Option<String>,
    pub host: String,
    pub likes: u64,
    pub shares: u64,
    pub create_time: Option<DateTime<Utc>>,
    pub uri: Option<String>,
    /// Fields this client does not model; written back untouched.
    pub extra: Map<String, Value>,
    /// Known keys exactly as they were read.
    origin: Map<String, Value>,
}

const NOTE_KEYS: [&str; 12] = [
    "id",
    "author_name",
    "author_finger",
    "content",
    "cw",
    "public_range",
    "category",
    "host",
    "likes",
    "shares",
    "create_time",
    "uri",
];

#[derive(Deserialize)]
struct NoteFields {
    id: NoteId,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    author_finger: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    cw: Option<String>,
    #[serde(default, deserialize_with = "lenient_public_range")]
    public_range: Option<PublicRange>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    host: String,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    shares: u64,
    #[serde(default)]
    create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    uri: Option<String>,
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        let origin: Map<String, Value> = NOTE_KEYS
            .iter()
            .filter_map(|k| extra.remove(*k).map(|v| (k.to_string(), v)))
            .collect();
        let f = NoteFields::deserialize(Value::Object(origin.clone()))
            .map_err(<D::Error as serde::de::Error>::custom)?;
        Ok(Self {
            id: f.id,
            author_name: f.author_name,
            author_finger: f.author_finger,
            content: f.content,
            cw: f.cw,
            public_range: f.public_range,
            category: f.category,
            host: f.host,
            likes: f.likes,
            shares: f.shares,
            create_time: f.create_time,
            uri: f.uri,
            extra,
            origin,
        })
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut w = RecordWriter::new(&self.origin);
        w.field("id", &self.id, false);
        w.field("author_name", &self.author_name, self.author_name.is_empty());
        w.field("author_finger", &self.author_finger, self.author_finger.is_empty());
        w.field("content", &self.content, false);
        w.field("cw", &self.cw, self.cw.is_none());
        w.field_with(
            "public_range",
            &self.public_range,
            self.public_range.is_none(),
            |raw| Some(public_range_from_value(raw)),
        );
        w.field("category", &self.category, self.category.is_none());
        w.field("host", &self.host, self.host.is_empty());
        w.field("likes", &self.likes, self.likes == 0);
        w.field("shares", &self.shares, self.shares == 0);
        w.field("create_time", &self.create_time, self.create_time.is_none());
        w.field("uri", &self.uri, self.uri.is_none());
        let mut out = w.finish().map_err(<S::Error as serde::ser::Error>::custom)?;
        for (k, v) in &self.extra {
            out.entry(k.clone()).or_insert_with(|| v.clone());
        }
        out.serialize(serializer)
    }
}

/// Builds the outgoing object for a record read earlier.
struct RecordWriter<'a> {
    origin: &'a Map<String, Value>,
    out: Map<String, Value>,
    error: Option<serde_json::Error>,
}

impl<'a> RecordWriter<'a> {
    fn new(origin: &'a Map<String, Value>) -> Self {
        Self {
            origin,
            out: Map::new(),
            error: None,
        }
    }

    fn field<T>(&mut self, key: &str, value: &T, empty: bool)
    where
        T: Serialize + DeserializeOwned + PartialEq,
    {
        self.field_with(key, value, empty, |raw| T::deserialize(raw).ok());
    }

    /// Reuses the raw value when it still decodes to `value`, writes `value`
    /// when it changed or was absent but is no longer empty.
    fn field_with<T, F>(&mut self, key: &str, value: &T, empty: bool, decode: F)
    where
        T: Serialize + PartialEq,
        F: FnOnce(&Value) -> Option<T>,
    {
        let raw = self.origin.get(key);
        let unchanged = raw.is_some_and(|raw| decode(raw).as_ref() == Some(value));
        let written = match raw {
            Some(raw) if unchanged => raw.clone(),
            None if empty => return,
            _ => match serde_json::to_value(value) {
                Ok(v) => v,
                Err(e) => {
                    self.error.get_or_insert(e);
                    return;
                }
            },
        };
        self.out.insert(key.to_string(), written);
    }

    fn finish(self) -> Result<Map<String, Value>, serde_json::Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

impl Note {
    /// A bare note with the given id and content. Handy for fixtures.
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        Self {
            id,
            author_name: String::new(),
            author_finger: String::new(),
            content: content.into(),
            cw: None,
            public_range: None,
            category: None,
            host: String::new(),
            likes: 0,
            shares: 0,
            create_time: None,
            uri: None,
            extra: Map::new(),
            origin: Map::new(),
        }
    }

    /// The content warning, if one is present and non-empty.
    pub fn content_warning(&self) -> Option<&str> {
        non_empty(self.cw.as_deref())
    }

    /// The category, if one is present and non-empty.
    pub fn category_name(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// An unpublished, editable precursor to a [`Note`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Draft {
    pub id: DraftId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cw: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_public_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub public_range: Option<PublicRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Profile / auth
// ---------------------------------------------------------------------------

/// The single local profile of the instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub finger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthStatus {
    pub logged_in: bool,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
