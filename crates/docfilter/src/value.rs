//! Filter values as the admin framework sends them.
//!
//! A clause value is either a plain scalar, a structured [`Matcher`] object,
//! or a list. The translator decides what each shape means based on the
//! clause's property type.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Value carried by a filter clause.
///
/// Converting from [`Bson`] classifies the value by shape: documents become
/// matchers, arrays become lists, everything else is a scalar. The
/// conversion back to [`Bson`] is lossless.
///
/// # Example
///
/// ```
/// use bson::{bson, doc, Bson};
/// use docfilter::FilterValue;
///
/// let value = FilterValue::from(Bson::Document(doc! { "start_with": "Ada" }));
/// assert_eq!(value.as_matcher().and_then(|m| m.start_with()), Some("Ada".to_string()));
///
/// let value = FilterValue::from(bson!("Ada"));
/// assert_eq!(value, FilterValue::Scalar(bson!("Ada")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Bson", into = "Bson")]
pub enum FilterValue {
    /// Scalar value: string, number, boolean, date, identifier, null.
    Scalar(Bson),
    /// Structured matcher object.
    Matcher(Matcher),
    /// Ordered list of values.
    List(Vec<Bson>),
}

impl FilterValue {
    /// Extracts the matcher, if present.
    pub fn as_matcher(&self) -> Option<&Matcher> {
        match self {
            FilterValue::Matcher(m) => Some(m),
            _ => None,
        }
    }

    /// Extracts the list, if present.
    pub fn as_list(&self) -> Option<&[Bson]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the value as raw BSON.
    pub fn to_bson(&self) -> Bson {
        self.clone().into()
    }
}

impl From<Bson> for FilterValue {
    fn from(value: Bson) -> Self {
        match value {
            Bson::Document(doc) => FilterValue::Matcher(Matcher(doc)),
            Bson::Array(items) => FilterValue::List(items),
            scalar => FilterValue::Scalar(scalar),
        }
    }
}

impl From<FilterValue> for Bson {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Scalar(b) => b,
            FilterValue::Matcher(m) => Bson::Document(m.0),
            FilterValue::List(items) => Bson::Array(items),
        }
    }
}

impl From<Matcher> for FilterValue {
    fn from(m: Matcher) -> Self {
        FilterValue::Matcher(m)
    }
}

impl From<Document> for FilterValue {
    fn from(doc: Document) -> Self {
        FilterValue::Matcher(Matcher(doc))
    }
}

impl From<Vec<Bson>> for FilterValue {
    fn from(items: Vec<Bson>) -> Self {
        FilterValue::List(items)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Scalar(Bson::String(s.to_string()))
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Scalar(Bson::String(s))
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Scalar(Bson::Int32(n))
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Scalar(Bson::Int64(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Scalar(Bson::Double(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Scalar(Bson::Boolean(b))
    }
}

impl From<bson::DateTime> for FilterValue {
    fn from(dt: bson::DateTime) -> Self {
        FilterValue::Scalar(Bson::DateTime(dt))
    }
}

impl From<bson::oid::ObjectId> for FilterValue {
    fn from(oid: bson::oid::ObjectId) -> Self {
        FilterValue::Scalar(Bson::ObjectId(oid))
    }
}

/// Structured matcher object.
///
/// Text matchers use `equal`, `start_with`, `end_with` and `contains`; range
/// matchers use `from` and `to`. A sub-field only counts as set when it is
/// [truthy](is_truthy), so `{"equal": ""}` behaves like an empty matcher.
/// Unknown keys are kept so the raw document survives a round trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matcher(Document);

impl Matcher {
    /// Wraps a raw matcher document.
    pub fn new(doc: Document) -> Self {
        Matcher(doc)
    }

    /// The raw matcher document.
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Exact-match text, if set.
    pub fn equal(&self) -> Option<String> {
        self.text("equal")
    }

    /// Prefix text, if set.
    pub fn start_with(&self) -> Option<String> {
        self.text("start_with")
    }

    /// Suffix text, if set.
    pub fn end_with(&self) -> Option<String> {
        self.text("end_with")
    }

    /// Substring text, if set.
    pub fn contains(&self) -> Option<String> {
        self.text("contains")
    }

    /// Lower range bound, if set.
    pub fn from(&self) -> Option<&Bson> {
        self.truthy("from")
    }

    /// Upper range bound, if set.
    pub fn to(&self) -> Option<&Bson> {
        self.truthy("to")
    }

    fn truthy(&self, key: &str) -> Option<&Bson> {
        self.0.get(key).filter(|v| is_truthy(v))
    }

    fn text(&self, key: &str) -> Option<String> {
        self.truthy(key).map(bson_to_text)
    }
}

/// Returns `false` for values the admin framework treats as "not set":
/// null, undefined, `false`, zero, NaN and the empty string.
pub fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => false,
        Bson::Boolean(b) => *b,
        Bson::String(s) => !s.is_empty(),
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0 && !n.is_nan(),
        _ => true,
    }
}

/// Renders a value as text for pattern building.
///
/// Strings are taken as-is; other scalars use their natural text form.
pub fn bson_to_text(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(n) => n.to_string(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::Null | Bson::Undefined => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{bson, doc};

    #[test]
    fn value_shape_checks() {
        assert!(matches!(FilterValue::from("x"), FilterValue::Scalar(_)));
        assert!(FilterValue::from(doc! { "equal": "x" }).as_matcher().is_some());
        assert_eq!(FilterValue::from(vec![bson!(1)]).as_list(), Some(&[bson!(1)][..]));
    }

    #[test]
    fn bson_classification() {
        assert!(FilterValue::from(bson!({ "from": 1 })).as_matcher().is_some());
        assert_eq!(
            FilterValue::from(bson!([1, 2])).as_list(),
            Some(&[bson!(1), bson!(2)][..])
        );
        assert_eq!(FilterValue::from(Bson::Null), FilterValue::Scalar(Bson::Null));
        assert_eq!(FilterValue::from(bson!("x")).as_list(), None);
    }

    #[test]
    fn to_bson_is_lossless() {
        let raw = bson!({ "equal": "x", "extra": 3 });
        assert_eq!(FilterValue::from(raw.clone()).to_bson(), raw);

        let raw = bson!(["a", "b"]);
        assert_eq!(FilterValue::from(raw.clone()).to_bson(), raw);
    }

    #[test]
    fn matcher_text_fields() {
        let m = Matcher::new(doc! { "equal": "a", "start_with": "b", "end_with": "c", "contains": "d" });
        assert_eq!(m.equal().as_deref(), Some("a"));
        assert_eq!(m.start_with().as_deref(), Some("b"));
        assert_eq!(m.end_with().as_deref(), Some("c"));
        assert_eq!(m.contains().as_deref(), Some("d"));
    }

    #[test]
    fn matcher_ignores_falsy_fields() {
        let m = Matcher::new(doc! { "equal": "", "contains": Bson::Null, "from": 0, "to": false });
        assert_eq!(m.equal(), None);
        assert_eq!(m.contains(), None);
        assert_eq!(m.from(), None);
        assert_eq!(m.to(), None);
    }

    #[test]
    fn matcher_coerces_text() {
        let m = Matcher::new(doc! { "equal": 42 });
        assert_eq!(m.equal().as_deref(), Some("42"));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&Bson::Null));
        assert!(!is_truthy(&bson!("")));
        assert!(!is_truthy(&bson!(0)));
        assert!(!is_truthy(&bson!(0i64)));
        assert!(!is_truthy(&bson!(f64::NAN)));
        assert!(!is_truthy(&bson!(false)));

        assert!(is_truthy(&bson!("0")));
        assert!(is_truthy(&bson!(-1)));
        assert!(is_truthy(&bson!({})));
        assert!(is_truthy(&Bson::DateTime(bson::DateTime::from_millis(0))));
    }

    #[test]
    fn deserializes_from_json() {
        let value: FilterValue = serde_json::from_str(r#"{"from": "2024-01-01"}"#).unwrap();
        assert!(value.as_matcher().is_some());

        let value: FilterValue = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(value, FilterValue::from("abc"));

        let value: FilterValue =
            serde_json::from_str(r#"{"$oid": "507f1f77bcf86cd799439011"}"#).unwrap();
        assert!(matches!(value, FilterValue::Scalar(Bson::ObjectId(_))));
    }
}
