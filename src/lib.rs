pub mod config;
pub mod iform;
pub mod line;
pub mod operand;
pub mod scanner;

pub use config::{FormConfig, MemoryPolicyKind};
pub use iform::{instruction_form, Classified, Classifier};
pub use line::{parse_line, InstructionLine};
pub use operand::{classify_operand, CoarseMemory, MemoryClassifier, OperandClass, VectorIndexedMemory, VectorWidth};
pub use scanner::{LineScanner, ScanError};
