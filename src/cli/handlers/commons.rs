// src/cli/handlers/commons.rs

// This module contains shared functions used by multiple handlers.

use anyhow::{Result, anyhow};
use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SITE_NAME_RE: Regex = {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap()
    };
}

/// Validates a site name before it becomes a filename on disk.
/// Returns the trimmed name, or an error for names that cannot be used.
pub fn validate_site_name(raw_name: &str) -> Result<String> {
    let name = raw_name.trim();

    // --- Strict, Blocking Errors ---
    if name.is_empty() {
        return Err(anyhow!("The site name cannot be empty."));
    }
    if name.contains(char::is_whitespace) {
        return Err(anyhow!("The site name cannot contain whitespace."));
    }
    if !SITE_NAME_RE.is_match(name) {
        return Err(anyhow!(
            "The site name '{}' contains invalid characters. Use letters, digits, '.', '_' or '-'.",
            name
        ));
    }

    // --- Soft, Non-Blocking Warnings ---
    if name.ends_with('.') || name.ends_with('-') || name.ends_with('_') {
        println!(
            "{}",
            format!(
                "Warning: The name '{}' ends with a special character. This is allowed but not recommended.",
                name
            )
            .yellow()
        );
    }

    Ok(name.to_string())
}

// MARK: --- UNIT TESTS ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_plain_names() {
        assert_eq!(validate_site_name(" mysite ").unwrap(), "mysite");
        assert_eq!(validate_site_name("my-site.dev").unwrap(), "my-site.dev");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(validate_site_name("   ").is_err());
        assert!(validate_site_name("my site").is_err());
    }

    #[test]
    fn rejects_path_separators() {
        assert!(validate_site_name("my/site").is_err());
        assert!(validate_site_name("..\\evil").is_err());
    }
}
