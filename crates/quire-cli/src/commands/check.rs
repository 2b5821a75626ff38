use super::run_common::{BatchArgs, compile_batch, report_diagnostics};

pub struct CheckArgs {
    pub batch: BatchArgs,
}

pub fn run(args: CheckArgs) {
    let output = compile_batch(&args.batch);
    if !report_diagnostics(&output, args.batch.color) {
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
