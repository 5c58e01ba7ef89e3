//! Formatting of user-facing status lines.
//!
//! Everything here writes to stderr so that stdout stays reserved for the
//! computed version.

use console::style;

use crate::domain::SemanticVersion;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Display the chart version change.
///
/// Shows either:
/// - If the chart had a readable version: "old -> new"
/// - Otherwise just the new version
pub fn display_version_change(chart: &str, old: Option<&SemanticVersion>, new: &SemanticVersion) {
    eprintln!("{}", format_version_change(chart, old, new));
}

/// Plain text of the version change line, without styling
pub fn format_version_change(
    chart: &str,
    old: Option<&SemanticVersion>,
    new: &SemanticVersion,
) -> String {
    match old {
        Some(old) => format!("{}: {} -> {}", chart, old, new),
        None => format!("{}: {}", chart, new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version_change() {
        let old = SemanticVersion::new(0, 1, 0);
        let new = SemanticVersion::new(0, 2, 0);
        assert_eq!(format_version_change("demo", Some(&old), &new), "demo: 0.1.0 -> 0.2.0");
        assert_eq!(format_version_change("demo", None, &new), "demo: 0.2.0");
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
        display_warning("test warning");
        display_success("test success");
    }
}
