//! # Minibank Reports
//!
//! Report generation - CSV, JSON, Markdown.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV format with proper escaping
//! - [`JsonExporter`] - JSON format (pretty or compact)
//! - [`MarkdownExporter`] - Markdown tables
//!
//! ## Reports
//!
//! - [`BankOverview`] - bank totals plus the customer listing
//! - [`AccountStatement`] - transaction history of one account
//!
//! ## Example
//!
//! ```rust,ignore
//! use minibank_reports::{BankOverview, MarkdownExporter, ReportExporter};
//!
//! let overview = BankOverview::from_bank(&mut bank);
//! println!("{}", MarkdownExporter::new().export(&overview));
//! ```

pub mod exporters;
pub mod statements;

pub use exporters::{
    write_report, CsvExporter, JsonExporter, MarkdownExporter, ReportData, ReportExporter,
};
pub use statements::{AccountStatement, BankOverview};
