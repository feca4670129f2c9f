//! Filter-to-query translation.
//!
//! The [`Translator`] runs the two passes over a filter list: array-group
//! collapsing, then per-clause translation with an ordered merge into one
//! query document.

use bson::Document;

use crate::clause::{FilterClause, Fragment};
use crate::flatten::collapse_array_groups;
use crate::identifier::{IdValidator, ObjectIdValidator};
use crate::options::{InvalidIdPolicy, TranslateOptions};

/// Translates filter lists into query documents.
///
/// Merge semantics: clauses are applied in order and each fragment replaces
/// any earlier value under the same key, so the later clause wins. A key
/// keeps the position where it was first written.
///
/// # Example
///
/// ```
/// use bson::doc;
/// use docfilter::{FilterClause, Property, Translator};
///
/// let filters = vec![
///     FilterClause::new(Property::string("title"), doc! { "start_with": "Intro" }),
///     FilterClause::new(Property::date("publishedAt"), doc! { "from": "2024-01-01" }),
///     FilterClause::new(Property::new("pages", "number"), 12),
/// ];
///
/// let query = Translator::new().translate(&filters);
/// assert_eq!(
///     query,
///     doc! {
///         "title": { "$regex": "^Intro", "$options": "i" },
///         "publishedAt": { "$gte": "2024-01-01" },
///         "pages": 12
///     }
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translator<V = ObjectIdValidator> {
    options: TranslateOptions,
    validator: V,
}

impl Translator<ObjectIdValidator> {
    /// Creates a translator with default options and ObjectId validation.
    pub fn new() -> Self {
        Translator::default()
    }
}

impl<V: IdValidator> Translator<V> {
    /// Replaces the options.
    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the identifier validator.
    pub fn with_validator<W: IdValidator>(self, validator: W) -> Translator<W> {
        Translator {
            options: self.options,
            validator,
        }
    }

    /// Returns the options in use.
    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Translates a filter list into a single query document.
    ///
    /// Never fails: an empty list yields an empty document, and clauses
    /// that can't be expressed contribute nothing.
    pub fn translate(&self, filters: &[FilterClause]) -> Document {
        if filters.is_empty() {
            return Document::new();
        }

        let collapsed;
        let clauses = if self.options.collapse_arrays {
            collapsed = collapse_array_groups(filters);
            collapsed.as_slice()
        } else {
            filters
        };

        let mut query = Document::new();
        for clause in clauses {
            match clause.fragment(&self.validator, &self.options) {
                Fragment::Condition { key, condition } => {
                    tracing::trace!(key = %key, condition = %condition, "clause translated");
                    query.insert(key, condition);
                }
                Fragment::Nothing => {
                    tracing::trace!(path = clause.path(), "clause contributes nothing");
                }
                Fragment::InvalidId { key } => match self.options.invalid_id {
                    InvalidIdPolicy::Skip => {
                        tracing::debug!(key = %key, "skipping clause with invalid identifier");
                    }
                    InvalidIdPolicy::Reset => {
                        tracing::debug!(
                            key = %key,
                            dropped = query.len(),
                            "invalid identifier, resetting query"
                        );
                        query = Document::new();
                    }
                },
            }
        }
        query
    }
}

/// Translates a filter list with default options.
///
/// `None` and an empty list both yield an empty document.
///
/// ```
/// use bson::doc;
/// use docfilter::{translate, FilterClause, Property};
///
/// assert_eq!(translate(None), doc! {});
///
/// let filters = [FilterClause::new(Property::string("name"), "a.b")];
/// assert_eq!(
///     translate(Some(&filters[..])),
///     doc! { "name": { "$regex": r"a\.b", "$options": "i" } }
/// );
/// ```
pub fn translate(filters: Option<&[FilterClause]>) -> Document {
    match filters {
        Some(filters) => Translator::new().translate(filters),
        None => Document::new(),
    }
}
