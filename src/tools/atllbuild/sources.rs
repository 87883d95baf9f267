//! Source collection for atllbuild tasks

use crate::error::{ConfigError, ConfigResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Resolve source descriptions against `base`.
///
/// Literal paths are kept as written; glob patterns expand to their sorted
/// matches. `dir/**.ext` is shorthand for `dir/**/*.ext`. Paths matching any
/// `exclude` pattern (relative to `base`) are dropped, as are duplicates.
pub fn collect_sources(
    task: &str,
    descriptions: &[String],
    exclude: &[String],
    base: &Path,
) -> ConfigResult<Vec<PathBuf>> {
    let excluded = build_globset(task, exclude)?;
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for description in descriptions {
        for path in expand(task, description, base)? {
            let relative = path.strip_prefix(base).unwrap_or(path.as_path());
            if excluded.is_match(relative) {
                continue;
            }
            if seen.insert(path.clone()) {
                sources.push(path);
            }
        }
    }

    if sources.is_empty() {
        return Err(ConfigError::invalid_field(task, "source", "no sources"));
    }
    Ok(sources)
}

fn expand(task: &str, description: &str, base: &Path) -> ConfigResult<Vec<PathBuf>> {
    let description = expand_recursive_shorthand(description);
    if !is_glob(&description) {
        return Ok(vec![base.join(description)]);
    }

    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&base.to_string_lossy()),
        description
    );
    let paths = glob::glob(&pattern)
        .map_err(|e| ConfigError::invalid_field(task, "source", format!("{}: {}", description, e)))?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| ConfigError::invalid_field(task, "source", e))?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}

/// `src/**.swift` -> `src/**/*.swift`
fn expand_recursive_shorthand(description: &str) -> String {
    if let Some(index) = description.find("**") {
        let (head, tail) = (&description[..index], &description[index + 2..]);
        let at_component_start = head.is_empty() || head.ends_with('/');
        if at_component_start && !tail.is_empty() && !tail.starts_with('/') {
            return format!("{}**/*{}", head, tail);
        }
    }
    description.to_string()
}

fn is_glob(description: &str) -> bool {
    description.contains(['*', '?', '['])
}

fn build_globset(task: &str, patterns: &[String]) -> ConfigResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| ConfigError::invalid_field(task, "excludeSources", e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ConfigError::invalid_field(task, "excludeSources", e))
}
