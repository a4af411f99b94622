use std::fmt;

use log::warn;

use super::model::{AsNumber, FieldValue, GroupCounts, Sequence};
use super::stats::mean;
use crate::error::{ErrorKind, GtexError, Result};

// ---------------------------------------------------------------------------
// CountGroup – anything that looks like a [label, counts] entry
// ---------------------------------------------------------------------------

/// A grouped-count entry as seen by [`filter_by_threshold`].
pub trait CountGroup {
    /// The group label, or `TypeWrong` when the entry has no string label.
    fn label(&self) -> Result<&str>;

    /// Mean of the entry's counts; `None` when the entry carries no count list.
    fn group_mean(&self) -> Option<Result<f64>>;
}

impl CountGroup for GroupCounts {
    fn label(&self) -> Result<&str> {
        Ok(self.label.as_str())
    }

    fn group_mean(&self) -> Option<Result<f64>> {
        Some(mean(&self.counts))
    }
}

impl CountGroup for FieldValue {
    fn label(&self) -> Result<&str> {
        match self {
            FieldValue::List(items) => match items.first() {
                Some(FieldValue::Text(label)) => Ok(label.as_str()),
                Some(other) => Err(GtexError::type_wrong(format!("group label {other} is not a string"))),
                None => Err(GtexError::type_wrong("group entry is empty")),
            },
            other => Err(GtexError::type_wrong(format!(
                "group entry {other} is not a [label, counts] list"
            ))),
        }
    }

    fn group_mean(&self) -> Option<Result<f64>> {
        match self {
            FieldValue::List(items) if items.len() > 1 => Some(match &items[1] {
                FieldValue::List(counts) => mean(counts),
                other => Err(GtexError::type_wrong(format!("counts {other} are not a list"))),
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold filter
// ---------------------------------------------------------------------------

/// Keep the entries whose mean is at least `threshold`, in their original order.
///
/// * outer container not a list, entry without a string label, non-numeric
///   threshold → `TypeWrong`
/// * no entries → `EmptyInput`
/// * an entry with a label but no count list → skipped with a warning
pub fn filter_by_threshold<S, T>(grouped: &S, threshold: &T) -> Result<Vec<S::Item>>
where
    S: Sequence + ?Sized,
    S::Item: CountGroup + Clone,
    T: AsNumber + fmt::Display + ?Sized,
{
    let entries = grouped.elements().map_err(|e| match e.kind() {
        ErrorKind::InvalidArgument => GtexError::type_wrong(format!("grouped counts must be a list: {e}")),
        _ => e,
    })?;

    let threshold = threshold
        .as_number()
        .filter(|t| !t.is_nan())
        .ok_or_else(|| GtexError::type_wrong(format!("threshold {threshold} is not a number")))?;

    if entries.is_empty() {
        return Err(GtexError::empty_input("no groups to filter"));
    }

    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        let label = entry.label()?;
        match entry.group_mean() {
            None => warn!("Group '{label}' has no read counts; skipping"),
            Some(group_mean) => {
                if group_mean? >= threshold {
                    kept.push(entry.clone());
                }
            }
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::data::model::Container;

    fn parse(json: &str) -> Container {
        let value: JsonValue = serde_json::from_str(json).unwrap();
        Container::from(value)
    }

    #[test]
    fn test_filter_typed_groups() {
        let grouped = vec![
            GroupCounts::new("Blood", vec![10, 20]),
            GroupCounts::new("Brain", vec![1, 2]),
        ];
        let kept = filter_by_threshold(&grouped, &5.0).unwrap();
        assert_eq!(kept, vec![GroupCounts::new("Blood", vec![10, 20])]);
    }

    #[test]
    fn test_filter_default_threshold_keeps_empty_groups() {
        let grouped = vec![
            GroupCounts::new("Blood", vec![10, 20]),
            GroupCounts::new("Kidney", vec![]),
        ];
        let kept = filter_by_threshold(&grouped, &0.0).unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_keeps_order() {
        let grouped = parse(r#"[["Lung", [9]], ["Blood", [1]], ["Brain", [7.5, 8]]]"#);
        let kept = filter_by_threshold(&grouped, &5i64).unwrap();
        let labels: Vec<&str> = kept.iter().map(|e| e.label().unwrap()).collect();
        assert_eq!(labels, vec!["Lung", "Brain"]);
    }

    #[test]
    fn test_filter_skips_label_only_entries() {
        let grouped = parse(r#"[["Blood", [10, 20]], ["Brain"]]"#);
        let kept = filter_by_threshold(&grouped, &0.0).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label().unwrap(), "Blood");
    }

    #[test]
    fn test_filter_empty() {
        let err = filter_by_threshold(&parse("[]"), &0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn test_filter_rejects_missing_labels() {
        for json in [r#"[1, 2, 3, 4, 5]"#, r#"[1, 2.0, 3, 4.0, 5]"#, r#"["Blood", [1, 2.0, 3, 4.0]]"#] {
            let err = filter_by_threshold(&parse(json), &0.0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeWrong, "{json}");
        }

        let numeric_label = parse(r#"[[3, [1, 2]]]"#);
        assert_eq!(filter_by_threshold(&numeric_label, &0.0).unwrap_err().kind(), ErrorKind::TypeWrong);
    }

    #[test]
    fn test_filter_rejects_non_list_container() {
        let err = filter_by_threshold(&parse(r#"{"Blood": [1, 2]}"#), &0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeWrong);
    }

    #[test]
    fn test_filter_rejects_non_numeric_threshold() {
        let grouped = vec![GroupCounts::new("Blood", vec![1, 2])];
        for threshold in [FieldValue::from("10"), FieldValue::from("ten")] {
            let err = filter_by_threshold(&grouped, &threshold).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeWrong);
        }
        assert_eq!(filter_by_threshold(&grouped, &f64::NAN).unwrap_err().kind(), ErrorKind::TypeWrong);
    }

    #[test]
    fn test_filter_rejects_string_counts() {
        let grouped = parse(r#"[["Blood", [1, "ipsum", 3]]]"#);
        assert_eq!(filter_by_threshold(&grouped, &0.0).unwrap_err().kind(), ErrorKind::TypeWrong);
    }
}
