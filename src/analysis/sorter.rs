//! Presentation order for aggregate rows.

use crate::models::AggregateRow;
use std::cmp::Ordering;

/// Order by algorithm, then run label, then file size.
///
/// Rows without a run label sort before labelled ones.
pub fn compare_rows<T: AggregateRow>(a: &T, b: &T) -> Ordering {
    a.algorithm()
        .cmp(b.algorithm())
        .then_with(|| a.run_label().cmp(&b.run_label()))
        .then_with(|| a.file_size_bytes().cmp(&b.file_size_bytes()))
}

/// Stable sort, so rows equal on every sort field keep their grouping order.
pub fn sort_rows<T: AggregateRow>(rows: &mut [T]) {
    rows.sort_by(compare_rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupKey, MemoryAggregate};

    fn row(algorithm: &str, run: Option<&str>, file: &str, size: i64) -> MemoryAggregate {
        MemoryAggregate::empty(&GroupKey::new(
            algorithm,
            run.map(String::from),
            file,
            size,
        ))
    }

    fn order(rows: &[MemoryAggregate]) -> Vec<String> {
        rows.iter()
            .map(|r| format!("{}/{}", r.algorithm, r.file_size_bytes))
            .collect()
    }

    #[test]
    fn test_sort_by_algorithm_then_size() {
        let mut rows = vec![row("b", None, "x", 10), row("a", None, "y", 50), row("a", None, "z", 5)];
        sort_rows(&mut rows);
        assert_eq!(order(&rows), vec!["a/5", "a/50", "b/10"]);
    }

    #[test]
    fn test_run_label_before_size() {
        let mut rows = vec![
            row("a", Some("m2"), "x", 1),
            row("a", Some("i9"), "x", 100),
            row("a", Some("i9"), "x", 10),
        ];
        sort_rows(&mut rows);
        let runs: Vec<_> = rows
            .iter()
            .map(|r| (r.run_label.clone().unwrap_or_default(), r.file_size_bytes))
            .collect();
        assert_eq!(
            runs,
            vec![
                ("i9".to_string(), 10),
                ("i9".to_string(), 100),
                ("m2".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut rows = vec![row("a", None, "second", 5), row("a", None, "first", 5)];
        sort_rows(&mut rows);
        assert_eq!(rows[0].file_label, "second");
        assert_eq!(rows[1].file_label, "first");
    }
}
