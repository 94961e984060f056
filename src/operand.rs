use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorWidth {
    X128,
    Y256,
    Z512,
}

impl VectorWidth {
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'X' => Some(Self::X128),
            'Y' => Some(Self::Y256),
            'Z' => Some(Self::Z512),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::X128 => 'X',
            Self::Y256 => 'Y',
            Self::Z512 => 'Z',
        }
    }
}

/// Syntactic category of a single operand token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandClass {
    Immediate,
    Opmask,
    Vector(VectorWidth),
    Memory,
    /// Memory operand indexed by a vector register (gather/scatter addressing).
    VectorMemory(VectorWidth),
    Register,
}

impl fmt::Display for OperandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandClass::Immediate => f.write_str("imm"),
            OperandClass::Opmask => f.write_str("K"),
            OperandClass::Vector(w) => write!(f, "{}", w.letter()),
            OperandClass::Memory => f.write_str("mem"),
            OperandClass::VectorMemory(w) => write!(f, "vmem{}", w.letter()),
            OperandClass::Register => f.write_str("reg"),
        }
    }
}

/// Decides the class of a token already known to be a memory operand.
pub trait MemoryClassifier {
    fn classify_memory(&self, token: &str) -> OperandClass;
}

/// Every memory operand is `mem`, whatever its displacement or index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoarseMemory;

impl MemoryClassifier for CoarseMemory {
    fn classify_memory(&self, _token: &str) -> OperandClass {
        OperandClass::Memory
    }
}

/// Splits out `disp(base)(X|Y|Z<n>*scale)` as `vmem<tier>`; other memory stays `mem`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorIndexedMemory;

impl MemoryClassifier for VectorIndexedMemory {
    fn classify_memory(&self, token: &str) -> OperandClass {
        MemoryOperand::parse(token)
            .and_then(|m| m.index)
            .and_then(|ix| ix.vector_width())
            .map_or(OperandClass::Memory, OperandClass::VectorMemory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexExpr<'a> {
    pub reg: &'a str,
    pub scale: u8,
}

impl IndexExpr<'_> {
    /// Tier of the index register when it is `X<n>`, `Y<n>` or `Z<n>`.
    pub fn vector_width(&self) -> Option<VectorWidth> {
        let mut chars = self.reg.chars();
        let width = VectorWidth::from_letter(chars.next()?)?;
        let num = chars.as_str();
        (!num.is_empty() && num.bytes().all(|b| b.is_ascii_digit())).then_some(width)
    }
}

/// `[sym][±digits] (base) [(index*scale)]`, e.g. `-17(BP)(SI*4)`, `(CX)` or
/// `table<>+8(SB)(Z1*4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryOperand<'a> {
    pub symbol: Option<&'a str>,
    pub disp: Option<i64>,
    pub base: &'a str,
    pub index: Option<IndexExpr<'a>>,
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn is_symbol(s: &str) -> bool {
    s.chars().next().is_some_and(|c| !c.is_ascii_digit())
        && s.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '·' | '<' | '>'))
}

/// Signed decimal; `None` when malformed or out of `i64` range.
fn parse_offset(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) { return None; }
    s.strip_prefix('+').unwrap_or(s).parse().ok()
}

fn paren_group(s: &str) -> Option<(&str, &str)> {
    let s = s.strip_prefix('(')?;
    let close = s.find(')')?;
    Some((&s[..close], &s[close + 1..]))
}

impl<'a> MemoryOperand<'a> {
    pub fn parse(token: &'a str) -> Option<Self> {
        let open = token.find('(')?;
        let (disp_text, rest) = token.split_at(open);
        let (symbol, disp) = match disp_text.find(&['+', '-'][..]) {
            _ if disp_text.is_empty() => (None, None),
            Some(0) => (None, Some(parse_offset(disp_text)?)),
            Some(pos) => {
                let (sym, off) = disp_text.split_at(pos);
                if !is_symbol(sym) { return None; }
                (Some(sym), Some(parse_offset(off)?))
            }
            None if disp_text.starts_with(|c: char| c.is_ascii_digit()) => (None, Some(parse_offset(disp_text)?)),
            None => {
                if !is_symbol(disp_text) { return None; }
                (Some(disp_text), None)
            }
        };

        let (base, rest) = paren_group(rest)?;
        if !is_word(base) { return None; }

        let index = if rest.is_empty() {
            None
        } else {
            let (inner, tail) = paren_group(rest)?;
            if !tail.is_empty() { return None; }
            let (reg, scale) = inner.split_once('*')?;
            if !is_word(reg) { return None; }
            let scale = match scale {
                "1" => 1,
                "2" => 2,
                "4" => 4,
                "8" => 8,
                _ => return None,
            };
            Some(IndexExpr { reg, scale })
        };
        Some(MemoryOperand { symbol, disp, base, index })
    }
}

/// Classifies by leading character first; the parenthesis test runs last.
///
/// Panics on an empty token: the scanner never produces one.
pub fn classify_with<M: MemoryClassifier + ?Sized>(token: &str, memory: &M) -> OperandClass {
    let Some(first) = token.chars().next() else {
        panic!("classify_operand: empty operand token");
    };
    match first {
        '$' => OperandClass::Immediate,
        'K' => OperandClass::Opmask,
        'X' => OperandClass::Vector(VectorWidth::X128),
        'Y' => OperandClass::Vector(VectorWidth::Y256),
        'Z' => OperandClass::Vector(VectorWidth::Z512),
        _ if token.contains('(') && token.contains(')') => memory.classify_memory(token),
        _ => OperandClass::Register,
    }
}

pub fn classify_operand(token: &str) -> OperandClass {
    classify_with(token, &CoarseMemory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_letter_wins() {
        assert_eq!(classify_operand("$65"), OperandClass::Immediate);
        assert_eq!(classify_operand("$(1<<3)"), OperandClass::Immediate);
        assert_eq!(classify_operand("K4"), OperandClass::Opmask);
        assert_eq!(classify_operand("X9"), OperandClass::Vector(VectorWidth::X128));
        assert_eq!(classify_operand("Y16"), OperandClass::Vector(VectorWidth::Y256));
        assert_eq!(classify_operand("Z0"), OperandClass::Vector(VectorWidth::Z512));
        assert_eq!(classify_operand("X(AX)"), OperandClass::Vector(VectorWidth::X128));
    }

    #[test]
    fn memory_vs_register() {
        assert_eq!(classify_operand("(CX)"), OperandClass::Memory);
        assert_eq!(classify_operand("-17(BP)(SI*4)"), OperandClass::Memory);
        assert_eq!(classify_operand("sym+8(SB)"), OperandClass::Memory);
        assert_eq!(classify_operand("R13"), OperandClass::Register);
        assert_eq!(classify_operand("AX"), OperandClass::Register);
        assert_eq!(classify_operand("(AX"), OperandClass::Register);
    }

    #[test]
    #[should_panic(expected = "empty operand")]
    fn empty_token_panics() {
        classify_operand("");
    }

    #[test]
    fn parses_memory_shapes() {
        let m = MemoryOperand::parse("-17(BP)(SI*4)").unwrap();
        assert_eq!(m.disp, Some(-17));
        assert_eq!(m.base, "BP");
        assert_eq!(m.index, Some(IndexExpr { reg: "SI", scale: 4 }));

        let m = MemoryOperand::parse("(CX)").unwrap();
        assert_eq!((m.disp, m.base, m.index), (None, "CX", None));

        assert!(MemoryOperand::parse("7(SI)(DI*3)").is_none());
        let m = MemoryOperand::parse("sym+8(SB)").unwrap();
        assert_eq!((m.symbol, m.disp, m.base), (Some("sym"), Some(8), "SB"));
        let m = MemoryOperand::parse("·tab<>-4(SB)(Y2*8)").unwrap();
        assert_eq!((m.symbol, m.disp), (Some("·tab<>"), Some(-4)));
        let m = MemoryOperand::parse("tab(SB)").unwrap();
        assert_eq!((m.symbol, m.disp), (Some("tab"), None));
        assert!(MemoryOperand::parse("sym+(SB)").is_none());
        assert!(MemoryOperand::parse("8sym(SB)").is_none());
        assert!(MemoryOperand::parse("99999999999999999999(AX)").is_none());
        assert!(MemoryOperand::parse("-(AX)").is_none());
        assert!(MemoryOperand::parse("(AX)(BX*2)junk").is_none());
    }

    #[test]
    fn vector_indexed_policy() {
        let p = VectorIndexedMemory;
        assert_eq!(classify_with("8(AX)(Y5*4)", &p), OperandClass::VectorMemory(VectorWidth::Y256));
        assert_eq!(classify_with("(R8)(Z31*8)", &p), OperandClass::VectorMemory(VectorWidth::Z512));
        assert_eq!(classify_with("7(SI)(DI*1)", &p), OperandClass::Memory);
        assert_eq!(classify_with("(SI)(X*1)", &p), OperandClass::Memory);
        assert_eq!(classify_with("sym+8(SB)(Z1*4)", &p), OperandClass::VectorMemory(VectorWidth::Z512));
        // out-of-range displacement fails the shape and stays plain memory
        assert_eq!(classify_with("99999999999999999999(AX)(Z1*4)", &p), OperandClass::Memory);
        assert_eq!(classify_with("8(AX)(Y5*4)", &CoarseMemory), OperandClass::Memory);
        assert_eq!(OperandClass::VectorMemory(VectorWidth::X128).to_string(), "vmemX");
    }
}
