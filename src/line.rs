use serde::Serialize;

/// Assembler pseudo-ops that share the instruction line shape but emit no instruction.
const DIRECTIVES: &[&str] = &[
    "TEXT", "DATA", "GLOBL", "FUNCDATA", "PCDATA", "BYTE", "WORD", "LONG", "QUAD",
];

const COMMENT_MARKER: &str = "//";

/// One disassembled instruction as it appeared in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionLine {
    pub mnemonic: String,
    pub operands: Vec<String>,
    /// Source line without its line terminator, annotation included.
    pub raw_text: String,
}

impl InstructionLine {
    /// Trailing comment text after the `//` marker, trimmed.
    pub fn annotation(&self) -> Option<&str> {
        split_annotation(&self.raw_text).1
    }

    /// Decodes an annotation made only of hex digit pairs (the encoded instruction bytes).
    pub fn encoded_bytes(&self) -> Option<Vec<u8>> {
        let hex = self.annotation()?;
        if hex.is_empty() || hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
            .collect()
    }
}

fn split_annotation(text: &str) -> (&str, Option<&str>) {
    match text.find(COMMENT_MARKER) {
        Some(pos) => (&text[..pos], Some(text[pos + COMMENT_MARKER.len()..].trim())),
        None => (text, None),
    }
}

fn is_mnemonic(tok: &str) -> bool {
    let mut bytes = tok.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_uppercase())
        && bytes.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'.' || b == b'_')
}

fn has_top_level_space(tok: &str) -> bool {
    let mut depth = 0i32;
    tok.chars().any(|c| {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
        depth == 0 && c.is_whitespace()
    })
}

/// `name:` before the mnemonic, as in `loop: VADDPD X1, X2, X3`.
fn strip_label(body: &str) -> &str {
    match body.split_once(':') {
        Some((name, rest))
            if name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '·')
                && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '·') =>
        {
            rest.trim_start()
        }
        _ => body,
    }
}

/// Splits on commas outside of `()` and `[]`. Returns `None` for unbalanced
/// brackets, an empty operand, or two tokens not separated by a comma.
fn split_operands(text: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 { return None; }
            }
            ',' if depth == 0 => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 { return None; }
    out.push(&text[start..]);

    let mut operands = Vec::with_capacity(out.len());
    for tok in out {
        let tok = tok.trim();
        if tok.is_empty() || has_top_level_space(tok) { return None; }
        operands.push(tok.to_string());
    }
    Some(operands)
}

/// Recognizes one instruction line. Directives, bare labels, comments, blank
/// lines and anything else off-shape yield `None`. A label in front of an
/// instruction is dropped; `raw_text` still carries it.
///
/// Any lone uppercase word (`RET`, but also a header such as `FAIL`) reads as a
/// zero-operand instruction: the line shape alone cannot tell them apart.
pub fn parse_line(text: &str) -> Option<InstructionLine> {
    let (body, _) = split_annotation(text);
    let body = strip_label(body.trim());
    if body.is_empty() { return None; }

    let (mnemonic, rest) = match body.split_once(char::is_whitespace) {
        Some((m, r)) => (m, r.trim()),
        None => (body, ""),
    };
    if !is_mnemonic(mnemonic) || DIRECTIVES.contains(&mnemonic) { return None; }

    let operands = if rest.is_empty() { Vec::new() } else { split_operands(rest)? };
    Some(InstructionLine {
        mnemonic: mnemonic.to_string(),
        operands,
        raw_text: text.to_string(),
    })
}
