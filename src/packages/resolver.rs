//! Canonical-to-apt package name mapping.

/// Canonical (Homebrew-style) names whose Debian package is named differently.
const APT_NAMES: &[(&str, &str)] = &[("go", "golang"), ("node", "nodejs"), ("python", "python3")];

/// Return the apt package name for a canonical package name.
///
/// Names without a mapping resolve to themselves.
#[must_use]
pub fn resolve(name: &str) -> &str {
    APT_NAMES
        .iter()
        .find_map(|&(canonical, apt)| (canonical == name).then_some(apt))
        .unwrap_or(name)
}
