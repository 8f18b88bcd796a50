use crate::common::errors::ThemeValidationError;

/// Core validation trait that all validators must implement.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Validator for theme ids (folder names under the themes root).
///
/// Any folder name is accepted as long as it stays one path segment:
/// `clean.v2` and `dark forest` are fine, `..` and `a/b` are not.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeIdValidator;

impl Validator<str> for ThemeIdValidator {
    type Error = ThemeValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let reject = |reason: &str| {
            Err(ThemeValidationError::InvalidThemeId {
                id: input.to_string(),
                reason: reason.to_string(),
            })
        };

        if input.is_empty() {
            return reject("Name cannot be empty");
        }

        if input == "." || input == ".." {
            return reject("Name cannot be a relative directory reference");
        }

        if input.contains(['/', '\\']) {
            return reject("Name contains a path separator");
        }

        if input.chars().any(char::is_control) {
            return reject("Name contains control characters");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_theme_ids() {
        let validator = ThemeIdValidator;
        for id in [
            "clean_new",
            "cyrodiil",
            "pinot-grigio",
            "Theme2",
            "тёмная",
            "clean.v2",
            "dark forest",
        ] {
            assert!(validator.validate(id).is_ok(), "{id} should be valid");
        }
        assert!(validator.validate(&"x".repeat(120)).is_ok());
    }

    #[test]
    fn test_invalid_theme_ids() {
        let validator = ThemeIdValidator;
        for id in ["", ".", "..", "a/b", "../etc", "a\\b", "tab\there", "nul\0"] {
            assert!(validator.validate(id).is_err(), "{id:?} should be rejected");
        }
    }
}
