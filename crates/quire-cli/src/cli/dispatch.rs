//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` mirror the command `*Args` but hold raw flag values; the `From`
//! impls resolve them (input source, mode, colors) for the handlers.

use std::path::PathBuf;

use clap::ArgMatches;
use quire_lib::config::Mode;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::compile::CompileArgs;
use crate::commands::loader::Input;
use crate::commands::run_common::BatchArgs;

/// Flags shared by every command.
pub struct BatchParams {
    pub path: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub schema: PathBuf,
    pub root: PathBuf,
    pub develop: bool,
    pub no_hooks: bool,
    pub color: ColorChoice,
    pub verbose: u8,
}

impl BatchParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            path: m.get_one::<PathBuf>("path").cloned(),
            manifest: m.get_one::<PathBuf>("manifest").cloned(),
            // Required by clap.
            schema: m.get_one::<PathBuf>("schema").cloned().unwrap_or_default(),
            root: m
                .get_one::<PathBuf>("root")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            develop: m.get_flag("develop"),
            no_hooks: m.get_flag("no_hooks"),
            color: parse_color(m),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<BatchParams> for BatchArgs {
    fn from(p: BatchParams) -> Self {
        let input = match p.manifest {
            Some(manifest) => Input::Manifest(manifest),
            None => Input::Directory(p.path.unwrap_or_else(|| PathBuf::from("."))),
        };
        Self {
            input,
            schema: p.schema,
            project_root: p.root,
            mode: if p.develop { Mode::Develop } else { Mode::Build },
            hooks_supported: !p.no_hooks,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub batch: BatchParams,
    // Note: output and compact are parsed but not extracted (unified flags)
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            batch: BatchParams::from_matches(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            batch: p.batch.into(),
        }
    }
}

pub struct CompileParams {
    pub batch: BatchParams,
    pub output: Option<PathBuf>,
    pub compact: bool,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            batch: BatchParams::from_matches(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            compact: m.get_flag("compact"),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            batch: p.batch.into(),
            output: p.output,
            compact: p.compact,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
