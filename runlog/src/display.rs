//! Plain-text rendering of the run log.

use crate::ledger::RunRecord;

/// Threshold used when the caller does not pass one.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Render records as a fixed-width table.
///
/// The `mark` column compares each record's best metric against the
/// threshold (`pass`/`fail`, `-` when the record has no rankable metrics).
pub fn render_table(records: &[RunRecord], threshold: Option<f64>) -> String {
    if records.is_empty() {
        return "no runs logged\n".to_string();
    }
    let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);

    let id_width = column_width(records.iter().map(|record| record.run_id.as_str()), "run_id");
    let name_width = column_width(records.iter().map(|record| record.name.as_str()), "name");

    let mut out = format!(
        "{:id_width$}  {:name_width$}  {:>11}  {:4}  notes\n",
        "run_id", "name", "best_metric", "mark"
    );
    for record in records {
        let best = record.best_metric();
        let shown = best.map_or_else(|| "-".to_string(), |value| format!("{value:.4}"));
        let mark = match best {
            Some(value) if value >= threshold => "pass",
            Some(_) => "fail",
            None => "-",
        };
        out.push_str(&format!(
            "{:id_width$}  {:name_width$}  {:>11}  {:4}  {}\n",
            record.run_id, record.name, shown, mark, record.notes
        ));
    }
    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values.map(str::len).max().unwrap_or(0).max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(run_id: &str, name: &str, metrics: &[(&str, f64)], notes: &str) -> RunRecord {
        RunRecord {
            run_id: run_id.to_string(),
            name: name.to_string(),
            timestamp: "2026-08-26T00:00:00+00:00".to_string(),
            config: BTreeMap::new(),
            metrics: metrics
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn empty_log_renders_placeholder() {
        assert_eq!(render_table(&[], None), "no runs logged\n");
    }

    #[test]
    fn marks_rows_against_threshold() {
        let records = vec![
            record("run_0000", "baseline", &[("accuracy", 0.85)], "ok"),
            record("run_0001", "weak", &[("accuracy", 0.42)], ""),
            record("run_0002", "empty", &[], "no metrics"),
        ];
        let table = render_table(&records, None);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("pass"));
        assert!(lines[2].contains("fail"));
        assert!(lines[3].contains('-'));
    }

    #[test]
    fn custom_threshold_changes_marks() {
        let records = vec![record("run_0000", "baseline", &[("accuracy", 0.5)], "")];
        assert!(render_table(&records, Some(0.4)).contains("pass"));
        assert!(render_table(&records, Some(0.6)).contains("fail"));
    }

    #[test]
    fn columns_fit_the_widest_value() {
        let records = vec![record(
            "run_0000_20260826_000000",
            "a-rather-long-experiment-name",
            &[("m", 1.0)],
            "",
        )];
        let table = render_table(&records, None);
        let header = table.lines().next().expect("header");
        assert!(header.len() >= "run_0000_20260826_000000".len());
        assert!(header.starts_with("run_id"));
    }
}
