//! Compiled query records and the minimal document behind them.

use std::path::Path;

use quire_core::utils::kebab_case;
use serde::Serialize;

use super::registry::FragmentRegistry;
use super::resolve::FragmentDeps;
use crate::ast::OperationDefinition;
use crate::config::CompilerConfig;
use crate::printer::print_operation;
use crate::source::RawDocument;
use crate::{Error, Result};

/// Marker in front of every static query id.
pub const STATIC_QUERY_PREFIX: &str = "sq--";

/// One compiled operation, ready to be persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub name: String,
    /// Resolved fragments followed by the operation, printed canonically.
    pub text: String,
    pub original_text: String,
    pub path: String,
    pub hash: u32,
    pub is_hook: bool,
    pub is_static_query: bool,
    /// Stable id, present for static queries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Id of a static query in `path`, from the path relative to `project_root`.
///
/// Separators of either platform split words the same way, so the id does
/// not depend on where the build runs.
pub fn static_query_id(path: impl AsRef<Path>, project_root: impl AsRef<Path>) -> String {
    let path = forward_slashes(path.as_ref());
    let root = forward_slashes(project_root.as_ref());
    let root = root.trim_end_matches('/');

    let relative = match path.strip_prefix(root) {
        Some(rest) if !root.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => path.as_str(),
    };
    let relative = relative.trim_start_matches('/').trim_start_matches("./");
    format!("{STATIC_QUERY_PREFIX}{}", kebab_case(relative))
}

fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The operation preceded by exactly the fragments it resolved to.
///
/// Fragments come in registration order so the text does not depend on
/// which operation filled the cache first.
pub fn minimal_document(
    registry: &FragmentRegistry<'_>,
    resolved: &FragmentDeps,
    operation: &OperationDefinition,
) -> String {
    let mut parts: Vec<String> = registry
        .canonical()
        .filter(|entry| resolved.fragments.contains(entry.name()))
        .map(|entry| entry.text.clone())
        .collect();
    parts.push(print_operation(operation));
    parts.join("\n\n")
}

/// Build the record for `operation`, failing the whole build for a hook
/// query the production runtime cannot run.
pub fn compile_query(
    config: &CompilerConfig,
    document: &RawDocument,
    operation: &OperationDefinition,
    text: String,
) -> Result<CompiledQuery> {
    if document.is_hook && !config.is_develop() && !config.hooks_supported {
        return Err(Error::UnsupportedHookRuntime {
            path: document.path.clone(),
        });
    }

    let id = document
        .is_static_query
        .then(|| static_query_id(&document.path, &config.project_root));

    Ok(CompiledQuery {
        name: operation.display_name().to_string(),
        text,
        original_text: document.text.clone(),
        path: document.path.clone(),
        hash: document.hash,
        is_hook: document.is_hook,
        is_static_query: document.is_static_query,
        id,
    })
}
