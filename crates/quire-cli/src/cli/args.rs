//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands,
//! so `check` and `compile` accept the same batch flags.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Directory searched for `.graphql` documents (positional).
pub fn path_arg() -> Arg {
    Arg::new("path")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory searched recursively for .graphql and .gql files [default: .]")
}

/// Extraction manifest (--manifest).
pub fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .long("manifest")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("path")
        .help("JSON list of extracted documents instead of a directory")
}

/// Schema file (--schema).
pub fn schema_arg() -> Arg {
    Arg::new("schema")
        .long("schema")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Schema as SDL, or as JSON when the file ends in .json")
}

/// Project root for static query ids (--root).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .value_name("DIR")
        .env("QUIRE_PROJECT_ROOT")
        .value_parser(value_parser!(PathBuf))
        .default_value(".")
        .help("Directory static query ids are relative to")
}

/// Development mode (--develop).
pub fn develop_arg() -> Arg {
    Arg::new("develop")
        .long("develop")
        .action(ArgAction::SetTrue)
        .help("Compile for a development session (errors go to the overlay)")
}

/// Runtime without hook support (--no-hooks).
pub fn no_hooks_arg() -> Arg {
    Arg::new("no_hooks")
        .long("no-hooks")
        .action(ArgAction::SetTrue)
        .help("Target runtime cannot execute static query hooks")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Output file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write compiled queries to file instead of stdout")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for debug logs, -vv for trace logs)")
}
