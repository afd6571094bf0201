use thiserror::Error;

/// Every failure raised while declaring, coercing, dumping, or persisting attributes.
///
/// Nested coercion never wraps an inner error, so a failure deep inside an
/// object tree reaches the caller as the innermost cause.
#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Parameter lower than minimum allowed value ({value}<{min})")]
    BelowMinimum { value: String, min: String },

    #[error("Parameter higher than maximum allowed value ({value}>{max})")]
    AboveMaximum { value: String, max: String },

    #[error("Number conversion error: {0}")]
    Conversion(String),

    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("Object is not a subclass of {expected}")]
    NotSubclass { expected: String },

    #[error("Unknown member '{name}' of enumeration {enumeration}")]
    Lookup {
        enumeration: &'static str,
        name: String,
    },

    #[error("Missing required attribute '{field}' for {owner}")]
    MissingField { owner: String, field: String },

    #[error("Unknown attribute '{field}' for {owner}")]
    UnknownField { owner: String, field: String },

    #[error("Invalid attribute declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AttributeError {
    /// Range violations, as opposed to conversion or shape failures.
    pub fn is_range_violation(&self) -> bool {
        matches!(
            self,
            AttributeError::BelowMinimum { .. } | AttributeError::AboveMaximum { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AttributeError>;
