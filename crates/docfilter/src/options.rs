//! Translation options.
//!
//! [`TranslateOptions`] is plain data: build it in code with the `with_*`
//! methods, or load it from JSON. Missing keys take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What an `id` clause with an invalid identifier does to the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidIdPolicy {
    /// The clause contributes nothing; earlier and later clauses are kept.
    #[default]
    Skip,
    /// Everything accumulated before the clause is dropped. Later clauses
    /// still contribute.
    Reset,
}

impl InvalidIdPolicy {
    /// Returns the policy name as used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidIdPolicy::Skip => "skip",
            InvalidIdPolicy::Reset => "reset",
        }
    }
}

impl std::fmt::Display for InvalidIdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InvalidIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(InvalidIdPolicy::Skip),
            "reset" => Ok(InvalidIdPolicy::Reset),
            other => Err(format!(
                "unknown invalid-id policy '{other}' (expected 'skip' or 'reset')"
            )),
        }
    }
}

/// Options controlling a [`Translator`](crate::Translator).
///
/// # Example
///
/// ```
/// use docfilter::{InvalidIdPolicy, TranslateOptions};
///
/// let opts = TranslateOptions::from_json(r#"{"invalid_id": "reset", "cast_ids": true}"#).unwrap();
/// assert_eq!(opts.invalid_id, InvalidIdPolicy::Reset);
/// assert!(opts.cast_ids);
/// assert!(opts.collapse_arrays);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Collapse dotted array-index clauses (`tags.0.value`, ...) into `$in`.
    pub collapse_arrays: bool,
    /// Handling of `id` clauses that fail validation.
    pub invalid_id: InvalidIdPolicy,
    /// Convert RFC 3339 string bounds of date clauses to BSON datetimes.
    pub coerce_dates: bool,
    /// Emit valid 24-hex id strings as BSON ObjectIds.
    pub cast_ids: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            collapse_arrays: true,
            invalid_id: InvalidIdPolicy::Skip,
            coerce_dates: false,
            cast_ids: false,
        }
    }
}

impl TranslateOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON. Absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enables or disables array-group collapsing.
    pub fn with_collapse_arrays(mut self, enabled: bool) -> Self {
        self.collapse_arrays = enabled;
        self
    }

    /// Sets the invalid-id policy.
    pub fn with_invalid_id(mut self, policy: InvalidIdPolicy) -> Self {
        self.invalid_id = policy;
        self
    }

    /// Enables or disables date coercion.
    pub fn with_coerce_dates(mut self, enabled: bool) -> Self {
        self.coerce_dates = enabled;
        self
    }

    /// Enables or disables ObjectId casting.
    pub fn with_cast_ids(mut self, enabled: bool) -> Self {
        self.cast_ids = enabled;
        self
    }
}
