//! Compiler configuration.

use std::path::{Path, PathBuf};

/// Default exec fuel for the parser (number of consumed tokens).
pub const DEFAULT_EXEC_FUEL: u32 = 1_000_000;

/// Default recursion fuel for the parser (nesting depth).
pub const DEFAULT_RECURSION_FUEL: u32 = 512;

/// Whether the surrounding build is a live development session or a production build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Errors are also pushed to the overlay channel.
    Develop,
    #[default]
    Build,
}

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Static query ids are derived from paths relative to this directory.
    pub project_root: PathBuf,
    pub mode: Mode,
    /// Whether the target runtime can execute hook queries.
    pub hooks_supported: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            mode: Mode::Build,
            hooks_supported: true,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_root(mut self, root: impl AsRef<Path>) -> Self {
        self.project_root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hooks_supported(mut self, supported: bool) -> Self {
        self.hooks_supported = supported;
        self
    }

    pub fn is_develop(&self) -> bool {
        self.mode == Mode::Develop
    }
}

/// Fuel limits shared by the query and schema parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }
}

impl ParseLimits {
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel = limit;
        self
    }
}
