//! Dynamic fields: a JSON object stored in one text column of a host record,
//! read and written key by key.
//!
//! The host keeps two things side by side: the backing text (what gets
//! persisted) and a [`DynamicSlot`] (the decoded mapping, cached for the
//! lifetime of the host). [`DynamicField`] borrows both and keeps them in
//! step: every write re-encodes the whole mapping into the backing text
//! before returning.
//!
//! ```
//! use hutils_core::dynamic::{DynamicField, DynamicSlot, Property};
//!
//! struct User {
//!     json_data: String,
//!     data: DynamicSlot,
//! }
//!
//! impl User {
//!     fn data(&mut self) -> hutils_core::error::Result<DynamicField<'_>> {
//!         DynamicField::bind(&mut self.json_data, &mut self.data)
//!     }
//! }
//!
//! const IS_DEVELOPER: Property<bool> = Property::new("is_developer");
//!
//! let mut user = User { json_data: String::new(), data: DynamicSlot::new() };
//! let mut data = user.data().unwrap();
//! assert!(!IS_DEVELOPER.get(&data).unwrap());
//! IS_DEVELOPER.set(&mut data, &true).unwrap();
//! assert_eq!(user.json_data, r#"{"is_developer": true}"#);
//! ```
//!
//! Setting a key to `null` removes it, so "unset" and "null" read the same.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::codec::{Codec, Json};
use crate::error::{DynamicError, Result};

/// Per-host cache of a dynamic field's decoded mapping.
///
/// Empty until the first bind; later binds reuse the cached mapping
/// instead of decoding the backing text again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicSlot {
    data: Option<Map<String, Value>>,
}

impl DynamicSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Forget the cached mapping so the next bind decodes the backing text,
    /// e.g. after the host was reloaded from storage.
    pub fn reset(&mut self) {
        self.data = None;
    }
}

/// A record that owns one or more dynamic fields.
pub trait Host {
    /// Backing text and cache slot of the dynamic field named `field`.
    fn dynamic_field(&mut self, field: &str) -> Option<(&mut String, &mut DynamicSlot)>;
}

/// Bind the dynamic field named `field` on `host`.
pub fn bind<'a, H>(host: &'a mut H, field: &str) -> Result<DynamicField<'a>>
where
    H: Host + ?Sized,
{
    let (text, slot) = host
        .dynamic_field(field)
        .ok_or_else(|| DynamicError::UnknownField(field.to_string()))?;
    DynamicField::bind(text, slot)
}

/// Mutable view over a host's dynamic field.
#[derive(Debug)]
pub struct DynamicField<'a, C: Codec = Json> {
    text: &'a mut String,
    data: &'a mut Map<String, Value>,
    codec: C,
}

impl<'a> DynamicField<'a, Json> {
    pub fn bind(text: &'a mut String, slot: &'a mut DynamicSlot) -> Result<Self> {
        Self::bind_with(text, slot, Json)
    }
}

impl<'a, C: Codec> DynamicField<'a, C> {
    /// Bind with a specific codec.
    ///
    /// An empty backing text is replaced by the encoded empty mapping before
    /// anything else happens. If the text cannot be decoded the slot stays
    /// empty and the error is returned.
    pub fn bind_with(text: &'a mut String, slot: &'a mut DynamicSlot, codec: C) -> Result<Self> {
        if slot.data.is_none() {
            if text.trim().is_empty() {
                *text = codec.encode(&Map::new())?;
                tracing::debug!("initialized empty dynamic field to {text}");
            }
            slot.data = Some(codec.decode(text)?);
        }
        let data = slot.data.get_or_insert_with(Map::new);
        Ok(Self { text, data, codec })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Read `key` converted to `T`, or `None` when absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.data
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|source| DynamicError::Coerce {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &*self.data
    }

    /// Current backing text.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Store `value` under `key`; `null` removes the key instead.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        self.apply(key.into(), value);
        self.flush()
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// Conversion happens before the mapping is touched, so a value that
    /// cannot be represented leaves both the mapping and the backing text
    /// as they were.
    pub fn set_value<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|source| DynamicError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.flush()?;
        }
        Ok(removed)
    }

    /// Apply several updates and encode the backing text once.
    pub fn set_many<I, K>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in updates {
            self.apply(key.into(), value);
        }
        self.flush()
    }

    fn apply(&mut self, key: String, value: Value) {
        if value.is_null() {
            self.data.remove(&key);
        } else {
            self.data.insert(key, value);
        }
    }

    fn flush(&mut self) -> Result<()> {
        *self.text = self.codec.encode(&*self.data)?;
        Ok(())
    }
}

/// A typed accessor for one key of a dynamic field.
///
/// Absent keys read as the declared default; present values are converted
/// with serde, so a stored value of the wrong shape is an error rather than
/// a silent default.
pub struct Property<T> {
    key: &'static str,
    default: fn() -> T,
}

impl<T: Default> Property<T> {
    pub const fn new(key: &'static str) -> Self {
        Self::with_default(key, T::default)
    }
}

impl<T> Property<T> {
    pub const fn with_default(key: &'static str, default: fn() -> T) -> Self {
        Self { key, default }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }
}

impl<T> Property<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn get<C: Codec>(&self, field: &DynamicField<'_, C>) -> Result<T> {
        match field.get_as(self.key)? {
            Some(value) => Ok(value),
            None => Ok(self.default_value()),
        }
    }

    pub fn set<C: Codec>(&self, field: &mut DynamicField<'_, C>, value: &T) -> Result<()> {
        field.set_value(self.key, value)
    }

    /// Store `Some(value)` or remove the key for `None`.
    pub fn set_option<C: Codec>(
        &self,
        field: &mut DynamicField<'_, C>,
        value: Option<&T>,
    ) -> Result<()> {
        match value {
            Some(value) => self.set(field, value),
            None => field.remove(self.key).map(|_| ()),
        }
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property").field("key", &self.key).finish()
    }
}
