use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use avx512_iform::{Classified, FormConfig, InstructionLine, LineScanner};

/// Classified lines grouped by form, forms kept in first-seen order.
#[derive(Debug, Default)]
pub struct FormTable {
    order: Vec<String>,
    groups: HashMap<String, Vec<InstructionLine>>,
    pub skipped: usize,
}

/// Up to `size` consecutive lines of one form.
#[derive(Debug, Clone, Copy)]
pub struct Span<'a> {
    pub form: &'a str,
    pub index: usize,
    pub lines: &'a [InstructionLine],
}

impl FormTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, c: Classified) {
        if !self.groups.contains_key(&c.form) {
            self.order.push(c.form.clone());
        }
        self.groups.entry(c.form).or_default().push(c.line);
    }

    /// Number of distinct forms.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total_lines(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn forms(&self) -> impl Iterator<Item = (&str, &[InstructionLine])> + '_ {
        self.order
            .iter()
            .filter_map(|f| self.groups.get(f).map(|lines| (f.as_str(), lines.as_slice())))
    }

    pub fn spans(&self, size: usize) -> Result<Vec<Span<'_>>> {
        anyhow::ensure!(size > 0, "span size must be at least 1");
        let mut out = Vec::new();
        for (form, lines) in self.forms() {
            for (index, chunk) in lines.chunks(size).enumerate() {
                out.push(Span { form, index, lines: chunk });
            }
        }
        Ok(out)
    }
}

pub fn scan_file(path: &Path, cfg: &FormConfig) -> Result<FormTable> {
    let classifier = cfg.classifier();
    let mut scanner = LineScanner::open(path)?;
    let mut table = FormTable::new();
    while scanner.advance()? {
        let Some(line) = scanner.line() else { continue };
        table.insert(classifier.classify_line(line.clone()));
    }
    table.skipped = scanner.skipped();
    debug!(forms = table.len(), lines = table.total_lines(), skipped = table.skipped, "grouped");
    Ok(table)
}
