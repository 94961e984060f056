use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use avx512_iform::{Classifier, LineScanner, MemoryPolicyKind};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print the instruction form of every instruction in a disassembly listing"
)]
struct Opts {
    /// Memory operand classification policy
    #[arg(long, value_enum, default_value_t = MemoryPolicyKind::Coarse)]
    memory: MemoryPolicyKind,
    /// Emit one JSON object per line instead of `form<TAB>text`
    #[arg(long)]
    json: bool,
    #[arg(value_name = "ASMFILE")]
    input: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let classifier = Classifier::with_policy(opts.memory);
    let mut scanner = LineScanner::open(&opts.input)?;

    while scanner.advance()? {
        let Some(line) = scanner.line() else { continue };
        let form = classifier.instruction_form(line);
        if opts.json {
            let out = serde_json::json!({ "form": form, "line": line });
            println!("{out}");
        } else {
            println!("{form}\t{}", line.raw_text);
        }
    }
    tracing::debug!(lines = scanner.line_number(), skipped = scanner.skipped(), "scan finished");

    Ok(())
}
