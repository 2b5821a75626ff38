//! Shared logic for check and compile commands.

use std::path::PathBuf;

use quire_lib::compile::{CompileOutput, Compiler};
use quire_lib::config::{CompilerConfig, Mode};
use quire_lib::report::LogReporter;
use tracing::info;

use super::loader::{Input, LoadError, load_documents, load_schema};

pub struct BatchArgs {
    pub input: Input,
    pub schema: PathBuf,
    pub project_root: PathBuf,
    pub mode: Mode,
    pub hooks_supported: bool,
    pub color: bool,
}

impl BatchArgs {
    pub fn config(&self) -> CompilerConfig {
        CompilerConfig::new()
            .with_project_root(&self.project_root)
            .with_mode(self.mode)
            .with_hooks_supported(self.hooks_supported)
    }
}

/// Load and compile the batch, exiting when no result can be produced.
pub fn compile_batch(args: &BatchArgs) -> CompileOutput {
    let schema = load_schema(&args.schema).unwrap_or_else(|err| exit_with(&err, args.color));
    let documents = load_documents(&args.input).unwrap_or_else(|err| exit_with(&err, args.color));
    info!(documents = documents.len(), "loaded batch");

    let compiler = Compiler::new(&schema, args.config());
    match compiler.compile(&documents, &mut LogReporter) {
        Ok(output) => output,
        Err(err) => {
            match err.code() {
                Some(code) => eprintln!("error[{}]: {}", code, err),
                None => eprintln!("error: {}", err),
            }
            std::process::exit(1);
        }
    }
}

/// Print diagnostics to stderr. Returns whether the batch was clean.
pub fn report_diagnostics(output: &CompileOutput, color: bool) -> bool {
    if output.diagnostics.is_empty() {
        return true;
    }
    eprintln!("{}", output.render_diagnostics(color));
    false
}

fn exit_with(err: &LoadError, color: bool) -> ! {
    eprintln!("error: {}", err);
    if let Some(rendered) = err.render_diagnostics(color) {
        eprintln!("{}", rendered);
    }
    std::process::exit(1)
}
