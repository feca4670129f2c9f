//! Property descriptors for filter clauses.
//!
//! The admin framework describes each filterable field with a name and a
//! type tag. [`PropertyType`] closes that tag set over the types the
//! translator handles specially; everything else lands in
//! [`PropertyType::Other`].

use serde::{Deserialize, Serialize};

/// Declared type of a filterable property.
///
/// Types are grouped by how their values are translated:
/// - **Text**: `String` - case-insensitive regex match
/// - **Range**: `Date`, `DateTime` - `$gte` / `$lte` bounds
/// - **Identifier**: `Id` - validated exact match
/// - **Everything else**: `Other` - raw exact match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    /// Free text.
    String,
    /// Calendar date.
    Date,
    /// Date with time of day.
    DateTime,
    /// Database identifier.
    Id,
    /// Any other type tag (number, boolean, reference, ...), kept verbatim.
    Other(String),
}

impl PropertyType {
    /// Returns the type tag as the admin framework spells it.
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::String => "string",
            PropertyType::Date => "date",
            PropertyType::DateTime => "datetime",
            PropertyType::Id => "id",
            PropertyType::Other(tag) => tag,
        }
    }
}

impl From<&str> for PropertyType {
    fn from(tag: &str) -> Self {
        match tag {
            "string" => PropertyType::String,
            "date" => PropertyType::Date,
            "datetime" => PropertyType::DateTime,
            "id" => PropertyType::Id,
            other => PropertyType::Other(other.to_string()),
        }
    }
}

impl From<String> for PropertyType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "string" | "date" | "datetime" | "id" => PropertyType::from(tag.as_str()),
            _ => PropertyType::Other(tag),
        }
    }
}

impl From<PropertyType> for String {
    fn from(kind: PropertyType) -> Self {
        match kind {
            PropertyType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A filterable property: its name (the output query key) and declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type")]
    kind: PropertyType,
}

impl Property {
    /// Creates a new property descriptor.
    pub fn new(name: impl Into<String>, kind: impl Into<PropertyType>) -> Self {
        Property {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Shorthand for a `string` property.
    pub fn string(name: impl Into<String>) -> Self {
        Property::new(name, PropertyType::String)
    }

    /// Shorthand for a `date` property.
    pub fn date(name: impl Into<String>) -> Self {
        Property::new(name, PropertyType::Date)
    }

    /// Shorthand for a `datetime` property.
    pub fn datetime(name: impl Into<String>) -> Self {
        Property::new(name, PropertyType::DateTime)
    }

    /// Shorthand for an `id` property.
    pub fn id(name: impl Into<String>) -> Self {
        Property::new(name, PropertyType::Id)
    }

    /// The property name, used as the key in the translated query.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared property type.
    pub fn kind(&self) -> &PropertyType {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!(PropertyType::from("string"), PropertyType::String);
        assert_eq!(PropertyType::from("date"), PropertyType::Date);
        assert_eq!(PropertyType::from("datetime"), PropertyType::DateTime);
        assert_eq!(PropertyType::from("id"), PropertyType::Id);
    }

    #[test]
    fn unknown_tags_are_other() {
        assert_eq!(
            PropertyType::from("number"),
            PropertyType::Other("number".into())
        );
        // Tags are case sensitive
        assert_eq!(
            PropertyType::from(String::from("String")),
            PropertyType::Other("String".into())
        );
    }

    #[test]
    fn display_round_trips_tag() {
        assert_eq!(PropertyType::DateTime.to_string(), "datetime");
        assert_eq!(PropertyType::Other("boolean".into()).to_string(), "boolean");
        assert_eq!(String::from(PropertyType::Id), "id");
    }

    #[test]
    fn property_deserializes_type_field() {
        let prop: Property =
            serde_json::from_str(r#"{"name": "createdAt", "type": "datetime"}"#).unwrap();
        assert_eq!(prop.name(), "createdAt");
        assert_eq!(prop.kind(), &PropertyType::DateTime);

        let prop: Property = serde_json::from_str(r#"{"name": "n", "type": "number"}"#).unwrap();
        assert_eq!(prop.kind(), &PropertyType::Other("number".into()));
    }
}
