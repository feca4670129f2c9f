//! Docfilter - Translate typed admin-panel filters into document-database queries.
//!
//! An admin UI hands over a list of filter clauses, each naming a property,
//! its declared type, and a value. Docfilter turns that list into a single
//! query document ready for a driver's `find`:
//!
//! - Text properties become case-insensitive `$regex` matches
//! - Date properties become `$gte` / `$lte` ranges
//! - Identifier properties are validated, then matched exactly
//! - Flattened array filters (`tags.0.value`, ...) collapse into `$in`
//! - Everything else is matched exactly
//!
//! # Quick Start
//!
//! ```rust
//! use bson::doc;
//! use docfilter::{FilterClause, Property, Translator};
//!
//! let filters = vec![
//!     FilterClause::new(Property::string("name"), doc! { "equal": "Ada" }),
//!     FilterClause::new(Property::datetime("createdAt"), doc! { "from": "2024-01-01", "to": "2024-12-31" }),
//!     FilterClause::with_path("tags.0.value", Property::new("tags", "array"), "math"),
//!     FilterClause::with_path("tags.1.value", Property::new("tags", "array"), "engines"),
//! ];
//!
//! let query = Translator::new().translate(&filters);
//! assert_eq!(
//!     query,
//!     doc! {
//!         "name": { "$regex": "^Ada$", "$options": "i" },
//!         "createdAt": { "$gte": "2024-01-01", "$lte": "2024-12-31" },
//!         "tags": { "$in": ["math", "engines"] }
//!     }
//! );
//! ```
//!
//! # Translation Rules
//!
//! | Property type | Value | Fragment |
//! |---------------|-------|----------|
//! | `string` | scalar `v` | `{ $regex: v, $options: "i" }` |
//! | `string` | `{ equal }` / `{ start_with }` / `{ end_with }` / `{ contains }` | `^v$` / `^v` / `v$` / `v` |
//! | `string` | matcher with none set, or a list | `{ $regex: "", $options: "i" }` |
//! | `date`, `datetime` | `{ from?, to? }` | `{ $gte: from, $lte: to }`, or nothing |
//! | `id` | valid identifier | `v` |
//! | `id` | invalid identifier | see [`InvalidIdPolicy`] |
//! | array group | list | `{ $in: list }` |
//! | anything else | `v` | `v` |
//!
//! Literal text is always regex-escaped. When two clauses write the same
//! key, the later clause wins.

mod clause;
mod error;
mod escape;
mod flatten;
mod identifier;
mod options;
mod property;
mod translate;
mod value;

// Re-export public API
pub use clause::{FilterClause, Fragment};
pub use error::{DocFilterError, Result};
pub use escape::escape_regex;
pub use flatten::{collapse_array_groups, unflatten};
pub use identifier::{IdValidator, ObjectIdValidator};
pub use options::{InvalidIdPolicy, TranslateOptions};
pub use property::{Property, PropertyType};
pub use translate::{translate, Translator};
pub use value::{bson_to_text, is_truthy, FilterValue, Matcher};
