//! Shared building blocks for record-oriented services.
//!
//! Two pieces carry most of the weight: ordered tagged enumerations
//! ([`tuple_enum!`] / [`TupleEnum`]) whose members carry a value, a label and
//! a lookup map, and [`DynamicField`], a typed attribute store layered over a
//! JSON text column. The rest are small helpers for request parameters,
//! dates, validation and JSON output.

pub mod catches;
pub mod clock;
pub mod codec;
pub mod config;
pub mod data_types;
pub mod dynamic;
pub mod enumeration;
pub mod error;
pub mod schemas;
pub mod shortcuts;
pub mod validation;
pub mod validators;

pub use catches::ResultExt;
pub use codec::{Codec, Json};
pub use config::{DateRangeSettings, PaginationSettings, Settings};
pub use data_types::{JsonOptions, format_json};
pub use dynamic::{DynamicField, DynamicSlot, Host, Property, bind};
pub use enumeration::{EnumDef, TupleEnum, Variant};
pub use error::{ConfigError, DataError, DynamicError, EnumError, Result, SchemaError};
pub use validation::{OptionExt, ValidationError, validation_error};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
