use std::fs;
use std::path::PathBuf;

use quire_lib::compile::CompileOutput;

use super::run_common::{BatchArgs, compile_batch, report_diagnostics};

pub struct CompileArgs {
    pub batch: BatchArgs,
    pub output: Option<PathBuf>,
    pub compact: bool,
}

pub fn run(args: CompileArgs) {
    let output = compile_batch(&args.batch);
    let clean = report_diagnostics(&output, args.batch.color);

    // Queries that compiled are written even when others failed.
    let json = match render_json(&output, args.compact) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: failed to serialize output: {}", e);
            std::process::exit(1);
        }
    };
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, format!("{json}\n")) {
                eprintln!("error: failed to write '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => println!("{}", json),
    }

    if !clean {
        std::process::exit(1);
    }
}

/// Compiled queries keyed by file path.
pub fn render_json(output: &CompileOutput, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(&output.queries)
    } else {
        serde_json::to_string_pretty(&output.queries)
    }
}
