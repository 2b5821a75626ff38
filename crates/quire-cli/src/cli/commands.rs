//! Command builders for the CLI.
//!
//! Both commands accept the full flag set; `check` hides the output flags
//! it ignores, so scripts can switch between the two without editing flags.

use clap::Command;

use super::args::*;

/// Flags every command reads.
fn with_batch_args(cmd: Command) -> Command {
    cmd.arg(path_arg())
        .arg(manifest_arg())
        .arg(schema_arg())
        .arg(root_arg())
        .arg(develop_arg())
        .arg(no_hooks_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("quire")
        .about("Validating compiler for GraphQL queries spread across a source tree")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(compile_command())
}

/// Validate a batch without writing output.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Validate every query of a batch")
        .override_usage(
            "\
  quire check [DIR] --schema <FILE>
  quire check --manifest <FILE> --schema <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  quire check src --schema schema.graphql            # every .graphql under src
  quire check --manifest queries.json --schema schema.json
  QUIRE_LOG=quire_lib=debug quire check src --schema schema.graphql"#,
        );

    with_batch_args(cmd)
        .arg(output_file_arg().hide(true))
        .arg(compact_arg().hide(true))
}

/// Compile a batch and write the compiled queries as JSON.
pub fn compile_command() -> Command {
    let cmd = Command::new("compile")
        .about("Compile a batch into JSON, keyed by file")
        .override_usage(
            "\
  quire compile [DIR] --schema <FILE> [-o <FILE>]
  quire compile --manifest <FILE> --schema <FILE> [-o <FILE>]",
        )
        .after_help(
            r#"EXAMPLES:
  quire compile src --schema schema.graphql -o queries.json
  quire compile --manifest queries.json --schema schema.json --root site
  quire compile src --schema schema.graphql --no-hooks --compact"#,
        );

    with_batch_args(cmd).arg(output_file_arg()).arg(compact_arg())
}
