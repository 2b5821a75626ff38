mod cli;
mod commands;

use cli::{CheckParams, CompileParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::init_logging(params.batch.verbose);
            commands::check::run(params.into());
        }
        Some(("compile", m)) => {
            let params = CompileParams::from_matches(m);
            commands::init_logging(params.batch.verbose);
            commands::compile::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
