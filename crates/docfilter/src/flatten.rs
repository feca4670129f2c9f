//! Dotted-key un-flattening and array-group collapsing.
//!
//! Array filters reach the translator flattened: one clause per element,
//! keyed `tags.0.value`, `tags.1.value`, ... [`collapse_array_groups`] folds
//! each such family back into a single membership clause before
//! translation.

use bson::{Bson, Document};
use regex::Regex;

use crate::clause::FilterClause;
use crate::escape::escape_regex;

/// Numeric segments above this are never array slots, so a hostile path
/// can't force a huge allocation.
const MAX_ARRAY_INDEX: usize = 4096;

/// Paths are split into at most this many segments; the last one keeps the
/// remainder of the path verbatim.
const MAX_PATH_DEPTH: usize = 32;

/// Rebuilds a nested document from `(dotted path, value)` pairs.
///
/// A path is split on `.`, into at most 32 segments. A segment followed by
/// a numeric segment becomes an array, any other intermediate segment a
/// document. Missing array slots are padded with `Null`. Pairs are applied
/// in order, so a later path overwrites whatever non-container value stands
/// in its way.
///
/// Indices above 4096 are plain document keys, except inside an array
/// that already exists: there the pair is dropped and the array kept.
///
/// ```
/// use bson::{bson, doc};
/// use docfilter::unflatten;
///
/// let nested = unflatten([("a.0.value", bson!("x")), ("a.1.value", bson!("y")), ("b", bson!(1))]);
/// assert_eq!(nested, doc! { "a": [{ "value": "x" }, { "value": "y" }], "b": 1 });
/// ```
pub fn unflatten<'a, I>(entries: I) -> Document
where
    I: IntoIterator<Item = (&'a str, Bson)>,
{
    let mut root = Document::new();
    for (path, value) in entries {
        let mut segments = path.splitn(MAX_PATH_DEPTH, '.');
        let Some(head) = segments.next() else {
            continue;
        };
        let rest: Vec<&str> = segments.collect();

        if !root.contains_key(head) {
            root.insert(head, Bson::Null);
        }
        if let Some(slot) = root.get_mut(head) {
            insert_path(slot, &rest, value);
        }
    }
    root
}

fn insert_path(target: &mut Bson, segments: &[&str], value: Bson) {
    let mut slot = target;
    for segment in segments {
        match descend(slot, segment) {
            Some(next) => slot = next,
            None => return,
        }
    }
    *slot = value;
}

/// Moves one segment down from `slot`, reshaping it into the container the
/// segment needs. Returns `None` when the segment can't be stored.
fn descend<'a>(slot: &'a mut Bson, segment: &str) -> Option<&'a mut Bson> {
    if let Some(idx) = array_index(segment) {
        if !matches!(slot, Bson::Array(_)) {
            *slot = Bson::Array(Vec::new());
        }
        let Bson::Array(items) = slot else {
            return None;
        };
        if items.len() <= idx {
            items.resize(idx + 1, Bson::Null);
        }
        return items.get_mut(idx);
    }

    if matches!(slot, Bson::Array(_)) && is_numeric(segment) {
        tracing::debug!(segment, max = MAX_ARRAY_INDEX, "array index out of range, dropped");
        return None;
    }

    if !matches!(slot, Bson::Document(_)) {
        *slot = Bson::Document(Document::new());
    }
    let Bson::Document(doc) = slot else {
        return None;
    };
    if !doc.contains_key(segment) {
        doc.insert(segment, Bson::Null);
    }
    doc.get_mut(segment)
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn array_index(segment: &str) -> Option<usize> {
    if !is_numeric(segment) {
        return None;
    }
    segment.parse().ok().filter(|idx| *idx <= MAX_ARRAY_INDEX)
}

/// Folds flattened array clauses into membership clauses.
///
/// Dotted clause paths and their values are un-flattened with
/// [`unflatten`]. For every top-level key whose value is an array:
///
/// 1. each element contributes its `value` field if it is a document, or
///    itself if it is a non-null scalar (`tags.0.value = x` and `tags.0 = x`
///    both yield `x`); holes and documents without `value` are skipped;
/// 2. every clause whose path matches `^<key>\.[0-9]+` is dropped;
/// 3. an [array group](FilterClause::array_group) over the collected values
///    takes the place of a clause keyed exactly `key`, or is appended.
///
/// The input is left untouched; a new list is returned.
pub fn collapse_array_groups(filters: &[FilterClause]) -> Vec<FilterClause> {
    let nested = unflatten(
        filters
            .iter()
            .filter(|clause| clause.path().contains('.'))
            .map(|clause| (clause.path(), clause.value().to_bson())),
    );

    let mut clauses = filters.to_vec();
    for (key, value) in &nested {
        let Bson::Array(items) = value else {
            continue;
        };

        let collected: Vec<Bson> = items
            .iter()
            .filter_map(|item| match item {
                Bson::Document(doc) => doc.get("value").cloned(),
                Bson::Null => None,
                scalar => Some(scalar.clone()),
            })
            .collect();

        match index_pattern(key) {
            Ok(pattern) => clauses.retain(|clause| !pattern.is_match(clause.path())),
            Err(err) => tracing::warn!(key = %key, error = %err, "cannot build array index pattern"),
        }

        tracing::debug!(key = %key, values = collected.len(), "collapsed array filter group");
        let group = FilterClause::array_group(key.clone(), collected);
        match clauses.iter_mut().find(|clause| clause.path() == key.as_str()) {
            Some(existing) => *existing = group,
            None => clauses.push(group),
        }
    }
    clauses
}

fn index_pattern(key: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"^{}\.[0-9]+", escape_regex(key)))
}
