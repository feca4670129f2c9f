//! Filter clauses and their query fragments.
//!
//! A [`FilterClause`] is one criterion from the admin filter: a key path, an
//! optional property descriptor, and a value. [`FilterClause::fragment`]
//! turns it into a [`Fragment`], the clause's contribution to the final
//! query document.

use bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::{DocFilterError, Result};
use crate::escape::escape_regex;
use crate::identifier::{parse_hex_id, IdValidator};
use crate::options::TranslateOptions;
use crate::property::{Property, PropertyType};
use crate::value::{bson_to_text, FilterValue, Matcher};

/// A single filter criterion.
///
/// A clause consists of:
/// - A path (its key in the admin filter, possibly dotted)
/// - A property (name and declared type), absent for pre-aggregated
///   array groups
/// - A value (scalar, matcher object, or list)
///
/// # Example
///
/// ```
/// use bson::doc;
/// use docfilter::{FilterClause, Property};
///
/// let clause = FilterClause::new(Property::string("title"), doc! { "start_with": "Intro" });
/// assert_eq!(clause.path(), "title");
/// assert_eq!(clause.key(), "title");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClause", into = "RawClause")]
pub struct FilterClause {
    path: String,
    property: Option<Property>,
    value: FilterValue,
}

impl FilterClause {
    /// Creates a clause keyed by the property's name.
    pub fn new(property: Property, value: impl Into<FilterValue>) -> Self {
        FilterClause {
            path: property.name().to_string(),
            property: Some(property),
            value: value.into(),
        }
    }

    /// Creates a clause with an explicit key path.
    pub fn with_path(
        path: impl Into<String>,
        property: Property,
        value: impl Into<FilterValue>,
    ) -> Self {
        FilterClause {
            path: path.into(),
            property: Some(property),
            value: value.into(),
        }
    }

    /// Creates a pre-aggregated array group: a membership test on `path`.
    pub fn array_group(path: impl Into<String>, values: Vec<Bson>) -> Self {
        FilterClause {
            path: path.into(),
            property: None,
            value: FilterValue::List(values),
        }
    }

    /// Parses a JSON array of clauses. `null` yields an empty list.
    ///
    /// Each clause is `{"path"?, "property"?: {"name", "type"}, "value"}`;
    /// at least one of `path` and `property` must be present.
    pub fn list_from_json(json: &str) -> Result<Vec<FilterClause>> {
        let raw: Option<Vec<RawClause>> = serde_json::from_str(json)?;
        raw.unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, clause)| {
                FilterClause::try_from(clause)
                    .map_err(|_| DocFilterError::invalid_clause(format!(
                        "clause {idx} has neither a path nor a property"
                    )))
            })
            .collect()
    }

    /// Reads a JSON clause list from `reader`. See [`list_from_json`](Self::list_from_json).
    pub fn list_from_reader(mut reader: impl std::io::Read) -> Result<Vec<FilterClause>> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::list_from_json(&json)
    }

    /// The clause's key path in the admin filter.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The property descriptor, absent for array groups.
    pub fn property(&self) -> Option<&Property> {
        self.property.as_ref()
    }

    /// The clause value.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// The key this clause writes in the translated query: the property
    /// name, or the path for array groups.
    pub fn key(&self) -> &str {
        match &self.property {
            Some(property) => property.name(),
            None => &self.path,
        }
    }

    /// Translates this clause into its query fragment.
    ///
    /// Never fails: shapes that don't fit the property type fall through to
    /// an exact match on the raw value, or to no contribution at all.
    pub fn fragment<V>(&self, validator: &V, options: &TranslateOptions) -> Fragment
    where
        V: IdValidator + ?Sized,
    {
        let Some(property) = &self.property else {
            let values = self
                .value
                .as_list()
                .map(<[Bson]>::to_vec)
                .unwrap_or_else(|| vec![self.value.to_bson()]);
            return Fragment::condition(&self.path, doc! { "$in": values });
        };

        let key = property.name();
        match property.kind() {
            PropertyType::String => match &self.value {
                FilterValue::Matcher(m) => Fragment::regex(key, text_pattern(m)),
                FilterValue::Scalar(s) => Fragment::regex(key, escape_regex(&bson_to_text(s))),
                // A list sets no text mode
                FilterValue::List(_) => Fragment::regex(key, String::new()),
            },
            PropertyType::Date | PropertyType::DateTime => self.range_fragment(key, options),
            PropertyType::Id => {
                let value = self.value.to_bson();
                if !validator.is_valid(&value) {
                    return Fragment::InvalidId {
                        key: key.to_string(),
                    };
                }
                if options.cast_ids {
                    if let Some(oid) = parse_hex_id(&value) {
                        return Fragment::condition(key, oid);
                    }
                }
                Fragment::condition(key, value)
            }
            PropertyType::Other(_) => Fragment::condition(key, self.value.to_bson()),
        }
    }

    fn range_fragment(&self, key: &str, options: &TranslateOptions) -> Fragment {
        let Some(m) = self.value.as_matcher() else {
            return Fragment::Nothing;
        };

        let mut range = Document::new();
        if let Some(from) = m.from() {
            range.insert("$gte", range_bound(from, options));
        }
        if let Some(to) = m.to() {
            range.insert("$lte", range_bound(to, options));
        }

        if range.is_empty() {
            Fragment::Nothing
        } else {
            Fragment::condition(key, range)
        }
    }
}

/// Picks the first set text mode, in precedence order.
fn text_pattern(m: &Matcher) -> String {
    if let Some(v) = m.equal() {
        format!("^{}$", escape_regex(&v))
    } else if let Some(v) = m.start_with() {
        format!("^{}", escape_regex(&v))
    } else if let Some(v) = m.end_with() {
        format!("{}$", escape_regex(&v))
    } else if let Some(v) = m.contains() {
        escape_regex(&v)
    } else {
        String::new()
    }
}

fn range_bound(bound: &Bson, options: &TranslateOptions) -> Bson {
    match bound {
        Bson::String(s) if options.coerce_dates => bson::DateTime::parse_rfc3339_str(s)
            .map(Bson::DateTime)
            .unwrap_or_else(|_| bound.clone()),
        _ => bound.clone(),
    }
}

/// One clause's contribution to the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Set `key` to `condition`, replacing any earlier value.
    Condition { key: String, condition: Bson },
    /// The clause contributes nothing.
    Nothing,
    /// An `id` clause whose value failed validation.
    InvalidId { key: String },
}

impl Fragment {
    /// Creates a one-key condition.
    pub fn condition(key: &str, condition: impl Into<Bson>) -> Self {
        Fragment::Condition {
            key: key.to_string(),
            condition: condition.into(),
        }
    }

    /// Creates a case-insensitive regex condition.
    pub fn regex(key: &str, pattern: String) -> Self {
        Fragment::condition(key, doc! { "$regex": pattern, "$options": "i" })
    }
}

/// Wire shape of a clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property: Option<Property>,
    #[serde(default)]
    value: Option<FilterValue>,
}

impl TryFrom<RawClause> for FilterClause {
    type Error = DocFilterError;

    fn try_from(raw: RawClause) -> Result<Self> {
        let path = match (raw.path, &raw.property) {
            (Some(path), _) => path,
            (None, Some(property)) => property.name().to_string(),
            (None, None) => {
                return Err(DocFilterError::invalid_clause(
                    "clause has neither a path nor a property",
                ))
            }
        };
        Ok(FilterClause {
            path,
            property: raw.property,
            value: raw.value.unwrap_or(FilterValue::Scalar(Bson::Null)),
        })
    }
}

impl From<FilterClause> for RawClause {
    fn from(clause: FilterClause) -> Self {
        RawClause {
            path: Some(clause.path),
            property: clause.property,
            value: Some(clause.value),
        }
    }
}
