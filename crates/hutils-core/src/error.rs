use thiserror::Error;

/// Errors raised while defining or querying a tagged enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumError {
    #[error("{type_name}: duplicate value {value} on {second} (already used by {first})")]
    DuplicateValue {
        type_name: &'static str,
        value: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("{type_name}: duplicate variant name {name}")]
    DuplicateName {
        type_name: &'static str,
        name: &'static str,
    },

    #[error("{type_name}: lookup map of {name} must be a JSON object")]
    InvalidLookup {
        type_name: &'static str,
        name: &'static str,
    },

    #[error("'{input}' is not a valid {type_name}")]
    Lookup {
        input: String,
        type_name: &'static str,
    },
}

/// Errors raised by the dynamic attribute store.
#[derive(Debug, Error)]
pub enum DynamicError {
    #[error("backing field is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("backing field holds {found}, expected a JSON object")]
    NotAMapping { found: &'static str },

    #[error("value for '{key}' cannot be serialized: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode backing field: {0}")]
    EncodeField(#[source] serde_json::Error),

    #[error("stored value for '{key}' has the wrong type: {source}")]
    Coerce {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("host has no dynamic field named '{0}'")]
    UnknownField(String),
}

/// Errors raised while reading request-style parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("'{key}' must be an integer, got {found}")]
    NotAnInteger { key: String, found: String },

    #[error("'{key}' must be a date (YYYY-MM-DD), got {found}")]
    NotADate { key: String, found: String },

    #[error("offset or limit out of range, please choose again")]
    OutOfRange,

    #[error("limit cannot be more than {0}, please choose again")]
    LimitExceeded(i64),

    #[error("start date is after end date, please choose a valid range")]
    ReversedRange,

    #[error("range spans more than {0} days, please choose a smaller range")]
    RangeTooWide(i64),
}

/// Errors raised by the plain data helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("missing key '{0}'")]
    MissingKey(String),

    #[error("{0} is too large to keep two decimal places")]
    QuantizeOverflow(rust_decimal::Decimal),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = DynamicError> = std::result::Result<T, E>;
