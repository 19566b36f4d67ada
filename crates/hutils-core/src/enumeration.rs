//! Ordered tagged enumerations.
//!
//! A tagged enumeration is a closed set of named constants. Each variant
//! carries a primary value (the discriminant used for equality and reverse
//! lookup), an optional display label, and an optional per-variant lookup
//! map. Variants keep their definition order, which is also the order of
//! [`EnumDef::choices`], so choice lists exported to forms and validators
//! come out exactly as written.
//!
//! There are two ways to get one:
//!
//! - [`EnumDef::builder`] for definitions assembled at runtime.
//! - [`tuple_enum!`](crate::tuple_enum) for a plain Rust `enum` whose
//!   metadata lives in a lazily built [`EnumDef`] behind the [`TupleEnum`]
//!   trait.
//!
//! ```
//! use hutils_core::{tuple_enum, TupleEnum};
//!
//! tuple_enum! {
//!     pub enum Gender: i64 {
//!         Unknown = 0, "Unknown";
//!         Male = 1, "Male";
//!         Female = 2, "Female";
//!     }
//! }
//!
//! assert_eq!(Gender::Female.value(), 2);
//! assert_eq!(Gender::Male.label(), Some("Male"));
//! assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde_json::{Map, Value};

use crate::error::EnumError;

/// Position of the primary value in [`Variant::value_at`].
pub const VALUE_INDEX: usize = 0;
/// Position of the display label in [`Variant::value_at`].
pub const LABEL_INDEX: usize = 1;
/// Position of the lookup map in [`Variant::value_at`].
pub const LOOKUP_INDEX: usize = 2;

/// One member of a tagged enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant<V> {
    name: &'static str,
    value: V,
    label: Option<&'static str>,
    lookup: Option<Map<String, Value>>,
}

/// A positional view over a variant's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aux<'a, V> {
    Value(&'a V),
    Label(&'static str),
    Lookup(&'a Map<String, Value>),
}

impl<V> Variant<V> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub fn lookup(&self) -> Option<&Map<String, Value>> {
        self.lookup.as_ref()
    }

    /// Default stored under `key` in this variant's lookup map.
    pub fn lookup_default(&self, key: &str) -> Option<&Value> {
        self.lookup.as_ref().and_then(|map| map.get(key))
    }

    /// Number of positional values this variant was defined with.
    ///
    /// Always at least one (the primary value). Labels and lookup maps are
    /// positional, so a lookup map implies a label slot even when no label
    /// was given.
    pub fn arity(&self) -> usize {
        if self.lookup.is_some() {
            3
        } else if self.label.is_some() {
            2
        } else {
            1
        }
    }

    /// Value at `index`, or `None` when the variant has no value there.
    pub fn value_at(&self, index: usize) -> Option<Aux<'_, V>> {
        match index {
            VALUE_INDEX => Some(Aux::Value(&self.value)),
            LABEL_INDEX => self.label.map(Aux::Label),
            LOOKUP_INDEX => self.lookup.as_ref().map(Aux::Lookup),
            _ => None,
        }
    }

    pub fn value_at_or<'a>(&'a self, index: usize, default: Aux<'a, V>) -> Aux<'a, V> {
        self.value_at(index).unwrap_or(default)
    }

    pub fn lowercase_name(&self) -> String {
        self.name.to_lowercase()
    }

    fn matches_name(&self, normalized: &str) -> bool {
        self.name.to_lowercase() == normalized
    }
}

/// An immutable, ordered set of variants with unique names and values.
#[derive(Debug, Clone)]
pub struct EnumDef<V> {
    type_name: &'static str,
    variants: Vec<Variant<V>>,
    by_value: HashMap<V, usize>,
}

impl<V> EnumDef<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    pub fn builder(type_name: &'static str) -> EnumBuilder<V> {
        EnumBuilder {
            type_name,
            variants: Vec::new(),
            invalid_lookup: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn variants(&self) -> &[Variant<V>] {
        &self.variants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant<V>> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Variant<V>> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// `(value, label)` pairs in definition order.
    pub fn choices(&self) -> Vec<(V, Option<&'static str>)> {
        self.variants
            .iter()
            .map(|v| (v.value.clone(), v.label))
            .collect()
    }

    /// Primary values in definition order.
    pub fn values(&self) -> Vec<V> {
        self.variants.iter().map(|v| v.value.clone()).collect()
    }

    /// Position of the variant whose name matches `text` case-insensitively.
    pub fn position_of_name(&self, text: &str) -> Result<usize, EnumError> {
        let normalized = text.trim().to_lowercase();
        self.variants
            .iter()
            .position(|v| v.matches_name(&normalized))
            .ok_or_else(|| EnumError::Lookup {
                input: text.to_string(),
                type_name: self.type_name,
            })
    }

    pub fn position_of_value(&self, value: &V) -> Option<usize> {
        self.by_value.get(value).copied()
    }

    /// Reverse lookup by name, ignoring case and surrounding whitespace.
    pub fn from_normalized_name(&self, text: &str) -> Result<&Variant<V>, EnumError> {
        self.position_of_name(text).map(|i| &self.variants[i])
    }

    pub fn from_value(&self, value: &V) -> Option<&Variant<V>> {
        self.position_of_value(value).map(|i| &self.variants[i])
    }
}

impl<'a, V> IntoIterator for &'a EnumDef<V> {
    type Item = &'a Variant<V>;
    type IntoIter = std::slice::Iter<'a, Variant<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

/// Collects variant definitions; [`EnumBuilder::build`] enforces uniqueness.
#[derive(Debug)]
pub struct EnumBuilder<V> {
    type_name: &'static str,
    variants: Vec<Variant<V>>,
    invalid_lookup: Option<&'static str>,
}

impl<V> EnumBuilder<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    pub fn variant(
        mut self,
        name: &'static str,
        value: V,
        label: Option<&'static str>,
    ) -> Self {
        self.variants.push(Variant {
            name,
            value,
            label,
            lookup: None,
        });
        self
    }

    pub fn variant_with_lookup(
        mut self,
        name: &'static str,
        value: V,
        label: Option<&'static str>,
        lookup: Map<String, Value>,
    ) -> Self {
        self.variants.push(Variant {
            name,
            value,
            label,
            lookup: Some(lookup),
        });
        self
    }

    /// Entry point used by [`tuple_enum!`](crate::tuple_enum); the lookup
    /// must be a JSON object.
    #[doc(hidden)]
    pub fn define(
        self,
        name: &'static str,
        value: V,
        label: Option<&'static str>,
        lookup: Option<Value>,
    ) -> Self {
        match lookup {
            None => self.variant(name, value, label),
            Some(Value::Object(map)) => self.variant_with_lookup(name, value, label, map),
            Some(_) => {
                let mut builder = self.variant(name, value, label);
                builder.invalid_lookup.get_or_insert(name);
                builder
            }
        }
    }

    pub fn build(self) -> Result<EnumDef<V>, EnumError> {
        if let Some(name) = self.invalid_lookup {
            return Err(EnumError::InvalidLookup {
                type_name: self.type_name,
                name,
            });
        }

        let mut by_value: HashMap<V, usize> = HashMap::with_capacity(self.variants.len());
        for (i, variant) in self.variants.iter().enumerate() {
            // Lookup is case-insensitive, so names must be unique ignoring case.
            let lowered = variant.lowercase_name();
            if self.variants[..i].iter().any(|v| v.matches_name(&lowered)) {
                return Err(EnumError::DuplicateName {
                    type_name: self.type_name,
                    name: variant.name,
                });
            }
            if let Some(&first) = by_value.get(&variant.value) {
                return Err(EnumError::DuplicateValue {
                    type_name: self.type_name,
                    value: format!("{:?}", variant.value),
                    first: self.variants[first].name,
                    second: variant.name,
                });
            }
            by_value.insert(variant.value.clone(), i);
        }

        Ok(EnumDef {
            type_name: self.type_name,
            variants: self.variants,
            by_value,
        })
    }
}

/// A Rust `enum` backed by an [`EnumDef`]. Usually derived with
/// [`tuple_enum!`](crate::tuple_enum).
///
/// `VARIANTS[i]` and `definition().variants()[i]` describe the same member.
pub trait TupleEnum: Copy + Eq + 'static {
    type Value: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static;

    const VARIANTS: &'static [Self];

    fn definition() -> &'static EnumDef<Self::Value>;

    fn index(self) -> usize;

    fn variant(self) -> &'static Variant<Self::Value> {
        &Self::definition().variants()[self.index()]
    }

    fn value(self) -> Self::Value {
        self.variant().value().clone()
    }

    fn name(self) -> &'static str {
        self.variant().name()
    }

    fn label(self) -> Option<&'static str> {
        self.variant().label()
    }

    fn value_at(self, index: usize) -> Option<Aux<'static, Self::Value>> {
        self.variant().value_at(index)
    }

    fn value_at_or(
        self,
        index: usize,
        default: Aux<'static, Self::Value>,
    ) -> Aux<'static, Self::Value> {
        self.variant().value_at_or(index, default)
    }

    fn lowercase_name(self) -> String {
        self.variant().lowercase_name()
    }

    fn all() -> std::iter::Copied<std::slice::Iter<'static, Self>> {
        Self::VARIANTS.iter().copied()
    }

    fn choices() -> Vec<(Self::Value, Option<&'static str>)> {
        Self::definition().choices()
    }

    fn values() -> Vec<Self::Value> {
        Self::definition().values()
    }

    fn from_normalized_name(text: &str) -> Result<Self, EnumError> {
        Self::definition()
            .position_of_name(text)
            .map(|i| Self::VARIANTS[i])
    }

    fn from_value(value: &Self::Value) -> Option<Self> {
        Self::definition()
            .position_of_value(value)
            .map(|i| Self::VARIANTS[i])
    }
}

/// Serde adapter that stores a [`TupleEnum`] as its primary value.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Account {
///     #[serde(with = "hutils_core::enumeration::by_value")]
///     status: Status,
/// }
/// ```
pub mod by_value {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::TupleEnum;

    pub fn serialize<E, S>(variant: &E, serializer: S) -> Result<S::Ok, S::Error>
    where
        E: TupleEnum,
        E::Value: Serialize,
        S: Serializer,
    {
        variant.value().serialize(serializer)
    }

    pub fn deserialize<'de, E, D>(deserializer: D) -> Result<E, D::Error>
    where
        E: TupleEnum,
        E::Value: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let value = E::Value::deserialize(deserializer)?;
        E::from_value(&value).ok_or_else(|| {
            D::Error::custom(format!(
                "{value:?} is not a valid {}",
                E::definition().type_name()
            ))
        })
    }
}

/// Declares a Rust `enum` and its [`TupleEnum`] metadata in one place.
///
/// Each variant lists its primary value, then optionally a label, then
/// optionally a JSON object literal used as its lookup map:
///
/// ```
/// use hutils_core::{tuple_enum, TupleEnum};
///
/// tuple_enum! {
///     /// Payment channels.
///     pub enum Channel: &'static str {
///         Cash = "cash", "Cash";
///         Card = "card", "Card", { "fee": "0.6" };
///         Voucher = "voucher";
///     }
/// }
///
/// assert_eq!(
///     Channel::Card.variant().lookup_default("fee"),
///     Some(&serde_json::json!("0.6"))
/// );
/// assert_eq!(Channel::Voucher.label(), None);
/// ```
///
/// Duplicate primary values panic with [`EnumError::DuplicateValue`] the
/// first time the definition is used.
#[macro_export]
macro_rules! tuple_enum {
    (@label) => { ::std::option::Option::None };
    (@label $label:expr) => { ::std::option::Option::Some($label) };
    (@lookup) => { ::std::option::Option::None };
    (@lookup $lookup:tt) => {
        ::std::option::Option::Some($crate::__private::serde_json::json!($lookup))
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $value_ty:ty {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr $(, $label:expr $(, $lookup:tt)?)?;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $crate::enumeration::TupleEnum for $name {
            type Value = $value_ty;

            const VARIANTS: &'static [Self] = &[$(Self::$variant,)+];

            fn definition() -> &'static $crate::enumeration::EnumDef<$value_ty> {
                static DEFINITION: ::std::sync::LazyLock<$crate::enumeration::EnumDef<$value_ty>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::enumeration::EnumDef::builder(stringify!($name))
                            $(
                                .define(
                                    stringify!($variant),
                                    $value,
                                    $crate::tuple_enum!(@label $($label)?),
                                    $crate::tuple_enum!(@lookup $($($lookup)?)?),
                                )
                            )+
                            .build()
                            .unwrap_or_else(|err| panic!("{err}"))
                    });
                &DEFINITION
            }

            fn index(self) -> usize {
                self as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::enumeration::TupleEnum::name(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::EnumError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::enumeration::TupleEnum>::from_normalized_name(s)
            }
        }
    };
}
