//! Report exporters - CSV, JSON, Markdown
//!
//! An exporter turns any [`ReportData`] into text; the data side only has to
//! say what its title, columns, rows and summary lines are.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Trait for exporting reports to different formats
pub trait ReportExporter {
    /// Export to the target format
    fn export(&self, report: &dyn ReportData) -> String;

    /// File extension for this format
    fn extension(&self) -> &'static str;

    /// MIME type for this format
    fn mime_type(&self) -> &'static str;
}

/// Trait for data that can be exported
pub trait ReportData {
    fn title(&self) -> &str;

    /// Column headers
    fn headers(&self) -> Vec<String>;

    /// Data rows, one cell per header
    fn rows(&self) -> Vec<Vec<String>>;

    /// Summary statistics as key-value pairs
    fn summary(&self) -> Vec<(String, String)>;
}

/// Export `report` into `dir`, naming the file `<stem>.<extension>`.
/// Returns the written path.
pub fn write_report(
    exporter: &dyn ReportExporter,
    report: &dyn ReportData,
    dir: &Path,
    stem: &str,
) -> io::Result<PathBuf> {
    let path = dir.join(format!("{}.{}", stem, exporter.extension()));
    fs::write(&path, exporter.export(report))?;
    Ok(path)
}

// ============================================================================
// CSV Exporter
// ============================================================================

/// CSV format exporter. Only the rows are written; summary lines have no
/// place in a flat table.
pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn escape_field(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn push_line(&self, output: &mut String, fields: &[String]) {
        let escaped: Vec<String> = fields.iter().map(|f| self.escape_field(f)).collect();
        output.push_str(&escaped.join(&self.delimiter.to_string()));
        output.push('\n');
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();

        if self.include_header {
            self.push_line(&mut output, &report.headers());
        }
        for row in report.rows() {
            self.push_line(&mut output, &row);
        }

        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}

// ============================================================================
// JSON Exporter
// ============================================================================

/// JSON format exporter
pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let headers = report.headers();

        let rows: Vec<serde_json::Value> = report
            .rows()
            .into_iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = headers
                    .iter()
                    .cloned()
                    .zip(row.into_iter().map(serde_json::Value::String))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();

        let summary: serde_json::Map<String, serde_json::Value> = report
            .summary()
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();

        let output = serde_json::json!({
            "title": report.title(),
            "summary": summary,
            "data": rows,
        });

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

// ============================================================================
// Markdown Exporter
// ============================================================================

/// Markdown format exporter
pub struct MarkdownExporter {
    include_summary: bool,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self {
            include_summary: true,
        }
    }
}

impl MarkdownExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }
}

impl ReportExporter for MarkdownExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_summary {
            output.push_str("## Summary\n\n");
            for (key, value) in report.summary() {
                output.push_str(&format!("- **{}**: {}\n", key, value));
            }
            output.push('\n');
        }

        let headers = report.headers();
        if headers.is_empty() {
            return output;
        }

        output.push_str("## Data\n\n");
        output.push_str(&format!("| {} |\n", headers.join(" | ")));
        let separator: Vec<&str> = headers.iter().map(|_| "---").collect();
        output.push_str(&format!("| {} |\n", separator.join(" | ")));

        for row in report.rows() {
            // Pipes inside a cell would split the column
            let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn mime_type(&self) -> &'static str {
        "text/markdown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ledger {
        rows: Vec<Vec<String>>,
    }

    impl ReportData for Ledger {
        fn title(&self) -> &str {
            "Ledger"
        }

        fn headers(&self) -> Vec<String> {
            vec!["ID".to_string(), "Type".to_string(), "Description".to_string()]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            self.rows.clone()
        }

        fn summary(&self) -> Vec<(String, String)> {
            vec![("Entries".to_string(), self.rows.len().to_string())]
        }
    }

    fn ledger() -> Ledger {
        Ledger {
            rows: vec![
                vec!["1".into(), "deposit".into(), "Deposit".into()],
                vec!["2".into(), "fee".into(), "Monthly maintenance fee".into()],
            ],
        }
    }

    #[test]
    fn test_csv_exporter() {
        let exporter = CsvExporter::new();
        let output = exporter.export(&ledger());

        assert_eq!(
            output,
            "ID,Type,Description\n1,deposit,Deposit\n2,fee,Monthly maintenance fee\n"
        );
        assert_eq!(exporter.extension(), "csv");
        assert_eq!(exporter.mime_type(), "text/csv");
    }

    #[test]
    fn test_csv_escaping_and_options() {
        let report = Ledger {
            rows: vec![vec!["1".into(), "deposit".into(), "Say \"hi\", then;".into()]],
        };

        let output = CsvExporter::new().export(&report);
        assert!(output.contains("\"Say \"\"hi\"\", then;\""));

        let output = CsvExporter::new()
            .with_delimiter(';')
            .without_header()
            .export(&report);
        assert_eq!(output, "1;deposit;\"Say \"\"hi\"\", then;\"\n");
    }

    #[test]
    fn test_json_exporter() {
        let output = JsonExporter::new().export(&ledger());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["title"], "Ledger");
        assert_eq!(value["summary"]["Entries"], "2");
        assert_eq!(value["data"][1]["Type"], "fee");
        assert_eq!(value["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_compact() {
        let output = JsonExporter::new().compact().export(&ledger());
        assert!(!output.contains('\n'));
        assert!(!output.contains("  "));
    }

    #[test]
    fn test_markdown_exporter() {
        let exporter = MarkdownExporter::new();
        let output = exporter.export(&ledger());

        assert!(output.starts_with("# Ledger\n"));
        assert!(output.contains("- **Entries**: 2"));
        assert!(output.contains("| ID | Type | Description |"));
        assert!(output.contains("| --- | --- | --- |"));
        assert!(output.contains("| 2 | fee | Monthly maintenance fee |"));
        assert_eq!(exporter.extension(), "md");
    }

    #[test]
    fn test_markdown_without_summary_escapes_pipes() {
        let report = Ledger {
            rows: vec![vec!["1".into(), "deposit".into(), "a|b".into()]],
        };
        let output = MarkdownExporter::new().without_summary().export(&report);

        assert!(!output.contains("## Summary"));
        assert!(output.contains("| 1 | deposit | a\\|b |"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&MarkdownExporter::new(), &ledger(), dir.path(), "ledger").unwrap();

        assert_eq!(path.file_name().unwrap(), "ledger.md");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("# Ledger"));
    }
}
