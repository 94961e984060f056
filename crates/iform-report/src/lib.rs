pub mod group;
pub mod report;

// Re-export commonly used types/functions for consumers
pub use group::{scan_file, FormTable, Span};
pub use report::{build_report, render_text, FormOut, Report, SpanOut};
