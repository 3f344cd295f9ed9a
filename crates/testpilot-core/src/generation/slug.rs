//! Spec filename derivation.

use crate::models::TestLanguage;

/// Lowercases `title` and joins its whitespace-separated words with hyphens.
///
/// ```rust
/// use testpilot_core::generation::slugify;
///
/// assert_eq!(slugify("Checkout Flow"), "checkout-flow");
/// assert_eq!(slugify("  Reset \t Password  "), "reset-password");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Spec filename for a title, e.g. `checkout-flow.spec.ts`.
pub fn spec_filename(title: &str, language: TestLanguage) -> String {
    format!("{}.spec.{}", slugify(title), language.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_filename() {
        assert_eq!(
            spec_filename("Checkout Flow", TestLanguage::TypeScript),
            "checkout-flow.spec.ts"
        );
        assert_eq!(
            spec_filename("User   Login\nFlow", TestLanguage::JavaScript),
            "user-login-flow.spec.js"
        );
    }

    #[test]
    fn test_slug_keeps_punctuation() {
        assert_eq!(slugify("Add-to-Cart (Guest)"), "add-to-cart-(guest)");
    }
}
