use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::group::FormTable;

#[derive(Debug, Clone, Serialize)]
pub struct FormOut { pub form: String, pub count: usize }

#[derive(Debug, Clone, Serialize)]
pub struct SpanOut { pub form: String, pub index: usize, pub lines: Vec<String> }

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub lines: usize,
    pub skipped: usize,
    pub forms: Vec<FormOut>,
    pub spans: Vec<SpanOut>,
}

pub fn build_report(table: &FormTable, span_size: usize) -> Result<Report> {
    let forms = table
        .forms()
        .map(|(form, lines)| FormOut { form: form.to_string(), count: lines.len() })
        .collect();
    let spans = table
        .spans(span_size)?
        .into_iter()
        .map(|s| SpanOut {
            form: s.form.to_string(),
            index: s.index,
            lines: s.lines.iter().map(|l| l.raw_text.clone()).collect(),
        })
        .collect();
    Ok(Report { lines: table.total_lines(), skipped: table.skipped, forms, spans })
}

/// Summary plus a per-form count table; with `listing`, every span's lines too.
pub fn render_text(report: &Report, listing: bool) -> String {
    let mut buf = String::new();
    let _ = writeln!(buf, "Form summary:");
    let _ = writeln!(buf, "  lines   : {}", report.lines);
    let _ = writeln!(buf, "  skipped : {}", report.skipped);
    let _ = writeln!(buf, "  forms   : {}", report.forms.len());
    let _ = writeln!(buf, "  spans   : {}", report.spans.len());
    let _ = writeln!(buf, "Forms:");
    for f in &report.forms {
        let _ = writeln!(buf, "  {:>6}  {}", f.count, f.form);
    }
    if listing {
        let _ = writeln!(buf, "\nSpans:");
        for s in &report.spans {
            let _ = writeln!(buf, "{} [{}]:", s.form, s.index);
            for l in &s.lines {
                let _ = writeln!(buf, "{l}");
            }
        }
    }
    buf
}
