//! Collection and data-quality display formatting

use crate::models::Collection;
use crate::services::IngestSummary;

/// One line of the collection listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatus {
    pub collection: Collection,
    pub documents: usize,
    pub snapshot_exists: bool,
}

/// Format the local snapshot of every collection as a table
pub fn format_collection_list(statuses: &[CollectionStatus]) -> String {
    if statuses.is_empty() {
        return "No collections configured.".to_string();
    }

    let name_width = statuses
        .iter()
        .map(|s| s.collection.name().len())
        .max()
        .unwrap_or(10)
        .max(10);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>9}  {}\n",
        "Collection",
        "Documents",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->9}  {:-<12}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for status in statuses {
        let state = if !status.snapshot_exists {
            "not imported"
        } else if status.documents == 0 {
            "empty"
        } else {
            "ok"
        };
        output.push_str(&format!(
            "{:<name_width$}  {:>9}  {}\n",
            status.collection.name(),
            status.documents,
            state,
            name_width = name_width,
        ));
    }

    output
}

/// Format what ingestion found, listing at most `limit` issues
pub fn format_ingest_summary(summary: &IngestSummary, limit: usize) -> String {
    let mut output = String::new();

    for (collection, counts) in &summary.collections {
        if counts.records == 0 {
            continue;
        }
        output.push_str(&format!(
            "{:<12} {:>6} documents, {} with issues\n",
            collection.name(),
            counts.records,
            counts.records_with_issues
        ));
    }

    if output.is_empty() {
        return "No documents imported yet.\n".to_string();
    }

    output.push('\n');
    if summary.issues.is_empty() {
        output.push_str("All documents read cleanly.\n");
        return output;
    }

    for issue in summary.issues.iter().take(limit) {
        output.push_str(&format!("  {}\n", issue));
    }
    if summary.issues.len() > limit {
        output.push_str(&format!(
            "  ... and {} more (use --all to list every issue)\n",
            summary.issues.len() - limit
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::services::{ingest_dataset, RawCollections};

    #[test]
    fn test_collection_list() {
        let statuses = vec![
            CollectionStatus {
                collection: Collection::Payments,
                documents: 12,
                snapshot_exists: true,
            },
            CollectionStatus {
                collection: Collection::Sales,
                documents: 0,
                snapshot_exists: false,
            },
        ];
        let output = format_collection_list(&statuses);
        assert!(output.contains("payments"));
        assert!(output.contains("12"));
        assert!(output.contains("not imported"));
    }

    #[test]
    fn test_ingest_summary_limits_issues() {
        let mut raw = RawCollections::new();
        raw.insert(
            Collection::Payments,
            vec![
                Record::new().with("id", "a").with("totalAmount", "abc"),
                Record::new().with("id", "b").with("date", "2025-01-01"),
                Record::new().with("id", "c").with("totalAmount", 5.0),
            ],
        );
        let (_, summary) = ingest_dataset(&raw);
        assert!(summary.total_issues() > 2);

        let output = format_ingest_summary(&summary, 2);
        assert!(output.contains("payments"));
        assert!(output.contains("3 with issues"));
        assert!(output.contains("more (use --all"));
    }

    #[test]
    fn test_empty_summary() {
        let output = format_ingest_summary(&IngestSummary::default(), 10);
        assert_eq!(output, "No documents imported yet.\n");
    }
}
