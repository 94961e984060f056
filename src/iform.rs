use serde::Serialize;

use crate::line::InstructionLine;
use crate::operand::{classify_with, CoarseMemory, MemoryClassifier, OperandClass};

/// A recognized line paired with its instruction form, as handed to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub form: String,
    pub line: InstructionLine,
}

/// Stateless; the memory policy is the only knob.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier<M = CoarseMemory> {
    memory: M,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: MemoryClassifier> Classifier<M> {
    pub fn with_policy(memory: M) -> Self {
        Self { memory }
    }

    pub fn classify_operand(&self, token: &str) -> OperandClass {
        classify_with(token, &self.memory)
    }

    /// `MNEMONIC` alone, or `MNEMONIC c1, c2, ...` with classes in operand order.
    pub fn form<S: AsRef<str>>(&self, mnemonic: &str, operands: &[S]) -> String {
        if operands.is_empty() {
            return mnemonic.to_string();
        }
        let classes: Vec<String> = operands
            .iter()
            .map(|op| self.classify_operand(op.as_ref()).to_string())
            .collect();
        format!("{mnemonic} {}", classes.join(", "))
    }

    pub fn instruction_form(&self, line: &InstructionLine) -> String {
        self.form(&line.mnemonic, &line.operands)
    }

    pub fn classify_line(&self, line: InstructionLine) -> Classified {
        Classified { form: self.instruction_form(&line), line }
    }
}

pub fn instruction_form(line: &InstructionLine) -> String {
    Classifier::new().instruction_form(line)
}
