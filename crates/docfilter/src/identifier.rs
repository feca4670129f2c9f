//! Identifier validation for `id` clauses.
//!
//! The translator never decides on its own what a valid identifier looks
//! like; it asks an [`IdValidator`]. [`ObjectIdValidator`] follows the
//! document database driver's ObjectId rules and is the default.

use bson::oid::ObjectId;
use bson::Bson;

/// Decides whether a clause value is a structurally valid identifier.
///
/// Implemented for any `Fn(&Bson) -> bool`, so a closure works for one-off
/// rules.
///
/// # Example
///
/// ```
/// use bson::Bson;
/// use docfilter::{FilterClause, Property, Translator};
///
/// // Numeric ids only
/// let translator = Translator::new().with_validator(|v: &Bson| matches!(v, Bson::Int64(_)));
///
/// let filters = vec![FilterClause::new(Property::id("_id"), 7i64)];
/// let query = translator.translate(&filters);
/// assert_eq!(query.get_i64("_id").ok(), Some(7));
/// ```
pub trait IdValidator {
    /// Returns `true` if `value` may be used as an identifier.
    fn is_valid(&self, value: &Bson) -> bool;
}

impl<F> IdValidator for F
where
    F: Fn(&Bson) -> bool,
{
    fn is_valid(&self, value: &Bson) -> bool {
        self(value)
    }
}

/// Validates values against the ObjectId format.
///
/// Accepted:
/// - `Bson::ObjectId` values
/// - 24-character hexadecimal strings
/// - 12-byte strings (any 12 bytes form an ObjectId)
/// - non-negative integers (the driver builds an ObjectId from a timestamp)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectIdValidator;

impl IdValidator for ObjectIdValidator {
    fn is_valid(&self, value: &Bson) -> bool {
        match value {
            Bson::ObjectId(_) => true,
            Bson::String(s) => s.len() == 12 || ObjectId::parse_str(s).is_ok(),
            Bson::Int32(n) => *n >= 0,
            Bson::Int64(n) => *n >= 0,
            _ => false,
        }
    }
}

/// Parses a 24-character hexadecimal string into an ObjectId.
///
/// Used when id casting is enabled; anything else is left to the caller.
pub(crate) fn parse_hex_id(value: &Bson) -> Option<ObjectId> {
    match value {
        Bson::String(s) if s.len() == 24 => ObjectId::parse_str(s).ok(),
        _ => None,
    }
}
