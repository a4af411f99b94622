//! Linear and index-annotated binary search over ordered sequences.
//!
//! ```text
//!  header: ["Description", "S2", "S1"]
//!        │ index_list
//!        ▼
//!  [("Description", 0), ("S2", 1), ("S1", 2)]
//!        │ SortedIndex::new (sort a private copy by value)
//!        ▼
//!  [("Description", 0), ("S1", 2), ("S2", 1)]
//!        │ find("S1")
//!        ▼
//!        2   ← original position, not the sorted one
//! ```

use std::fmt;

use super::model::{IndexedEntry, Sequence};
use crate::error::{GtexError, Result};

/// Position of the first element equal to `target`.
///
/// Fails with `InvalidArgument` when `sequence` is not ordered, `EmptyInput`
/// when it has no elements and `NotFound` after a full scan without a match.
pub fn linear_search<S, Q>(target: &Q, sequence: &S) -> Result<usize>
where
    S: Sequence + ?Sized,
    S::Item: PartialEq<Q>,
    Q: fmt::Display + ?Sized,
{
    let elements = sequence.elements()?;
    if elements.is_empty() {
        return Err(GtexError::empty_input("nothing to search"));
    }

    elements
        .iter()
        .position(|field| field == target)
        .ok_or_else(|| GtexError::not_found(target))
}

/// Tag every element with its position in `sequence`, preserving order.
pub fn index_list<S>(sequence: &S) -> Result<Vec<IndexedEntry<S::Item>>>
where
    S: Sequence + ?Sized,
    S::Item: Clone,
{
    let elements = sequence.elements()?;
    if elements.is_empty() {
        return Err(GtexError::empty_input("nothing to index"));
    }

    Ok(elements
        .iter()
        .enumerate()
        .map(|(position, value)| IndexedEntry {
            value: value.clone(),
            position,
        })
        .collect())
}

/// Binary search for `target`, returning the matching entry's original position.
///
/// Sorts a private copy of `indexed`; the caller's collection is untouched.
/// Callers looking up many targets in the same collection should build a
/// [`SortedIndex`] once instead.
pub fn binary_search<S, T>(target: &str, indexed: &S) -> Result<usize>
where
    S: Sequence<Item = IndexedEntry<T>> + ?Sized,
    T: AsRef<str> + Clone,
{
    let entries = indexed.elements()?.to_vec();
    SortedIndex::new(entries).find(target)
}

// ---------------------------------------------------------------------------
// SortedIndex – indexed entries sorted once by value
// ---------------------------------------------------------------------------

/// Indexed entries sorted by value (case-sensitive), ready for repeated lookups.
#[derive(Debug, Clone)]
pub struct SortedIndex<T> {
    entries: Vec<IndexedEntry<T>>,
}

impl<T: AsRef<str>> SortedIndex<T> {
    /// Take ownership of `entries` and sort them by value. The sort is stable,
    /// so duplicate values keep their original relative order.
    pub fn new(mut entries: Vec<IndexedEntry<T>>) -> Self {
        entries.sort_by(|a, b| a.value.as_ref().cmp(b.value.as_ref()));
        SortedIndex { entries }
    }

    /// Original position of an entry whose value equals `target`.
    ///
    /// The midpoint test is an exact, case-sensitive comparison, while the
    /// choice of half compares lower-cased values. A target whose case differs
    /// from the stored value is therefore never found, and ordering that
    /// disagrees between the two policies can hide an exact match.
    pub fn find(&self, target: &str) -> Result<usize> {
        let target_lower = target.to_lowercase();

        // open interval (low, high) of positions into the sorted entries
        let mut low: isize = -1;
        let mut high = self.entries.len() as isize;

        while high - low > 1 {
            let mid = (high + low) / 2;
            let entry = &self.entries[mid as usize];
            let value = entry.value.as_ref();

            if value == target {
                return Ok(entry.position);
            }

            if target_lower < value.to_lowercase() {
                high = mid;
            } else {
                low = mid;
            }
        }

        Err(GtexError::not_found(target))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
