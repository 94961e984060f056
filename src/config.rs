use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::iform::Classifier;
use crate::operand::{CoarseMemory, MemoryClassifier, OperandClass, VectorIndexedMemory};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryPolicyKind {
    /// Single `mem` class for every memory operand
    #[default]
    Coarse,
    /// Separate `vmemX`/`vmemY`/`vmemZ` for vector-indexed addressing
    VectorIndexed,
}

impl MemoryClassifier for MemoryPolicyKind {
    fn classify_memory(&self, token: &str) -> OperandClass {
        match self {
            MemoryPolicyKind::Coarse => CoarseMemory.classify_memory(token),
            MemoryPolicyKind::VectorIndexed => VectorIndexedMemory.classify_memory(token),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub memory: MemoryPolicyKind,
    /// Lines of one form grouped into a single benchmark span.
    pub span_size: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            memory: MemoryPolicyKind::Coarse,
            span_size: 100,
        }
    }
}

impl FormConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn classifier(&self) -> Classifier<MemoryPolicyKind> {
        Classifier::with_policy(self.memory)
    }
}
