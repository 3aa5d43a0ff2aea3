//! The curated default developer toolset.
//!
//! Catalog order is install order and the order names are offered in.
use super::Backend;
use crate::config::Package;

/// Canonical name and preferred backend of every default tool.
const DEV_TOOLS: &[(&str, Backend)] = &[
    ("neovim", Backend::Brew),
    ("starship", Backend::Brew),
    ("byobu", Backend::Brew),
    ("fzf", Backend::Brew),
    ("ripgrep", Backend::Brew),
    ("bat", Backend::Brew),
    ("eza", Backend::Brew),
    ("jq", Backend::Brew),
    ("gh", Backend::Brew),
    ("go", Backend::Brew),
    ("node", Backend::Brew),
    ("python", Backend::Brew),
];

/// Backend tag given to selected names that are not in the catalog.
pub const FALLBACK_BACKEND: Backend = Backend::Brew;

/// The catalog as persisted packages.
#[must_use]
pub fn dev_tools() -> Vec<Package> {
    DEV_TOOLS
        .iter()
        .map(|&(name, backend)| Package::new(name, backend.as_str()))
        .collect()
}

/// Catalog names in order.
#[must_use]
pub fn dev_tool_names() -> Vec<String> {
    DEV_TOOLS.iter().map(|&(name, _)| name.to_string()).collect()
}

/// Map selected names back to packages, keeping selection order.
///
/// Names found in the catalog keep their catalog backend; any other name gets
/// [`FALLBACK_BACKEND`]. A name already present in `existing` carries that
/// entry's extra keys forward.
#[must_use]
pub fn names_to_packages(names: &[String], existing: &[Package]) -> Vec<Package> {
    names
        .iter()
        .map(|name| {
            let backend = DEV_TOOLS
                .iter()
                .find_map(|&(tool, backend)| (tool == name.as_str()).then_some(backend))
                .unwrap_or(FALLBACK_BACKEND);
            let mut pkg = Package::new(name, backend.as_str());
            if let Some(prev) = existing.iter().find(|p| p.name == *name) {
                pkg.extra.clone_from(&prev.extra);
            }
            pkg
        })
        .collect()
}
