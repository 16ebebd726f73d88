use thiserror::Error;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const DESCRIPTION_HINT_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node name is required")]
    NameEmpty,
    #[error("node name must have at least {} characters", NAME_MIN_CHARS)]
    NameTooShort,
    #[error("node name is too long ({len} characters, max {})", NAME_MAX_CHARS)]
    NameTooLong { len: usize },
}

/// Trims the name and checks it against the length window. Lengths are
/// counted in characters so emoji prefixes count once.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    let len = name.chars().count();
    match len {
        0 => Err(ValidationError::NameEmpty),
        len if len < NAME_MIN_CHARS => Err(ValidationError::NameTooShort),
        len if len > NAME_MAX_CHARS => Err(ValidationError::NameTooLong { len }),
        _ => Ok(name.to_string()),
    }
}

/// Advisory only; short descriptions never block an action.
pub fn description_hint(raw: &str) -> Option<&'static str> {
    let len = raw.trim().chars().count();
    if len > 0 && len < DESCRIPTION_HINT_CHARS {
        Some("a description of at least 10 characters is more useful")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn name_length_boundaries() {
        assert_eq!(validate_name(&name_of(0)), Err(ValidationError::NameEmpty));
        assert_eq!(validate_name(&name_of(1)), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name(&name_of(2)), Ok(name_of(2)));
        assert_eq!(validate_name(&name_of(50)), Ok(name_of(50)));
        assert_eq!(
            validate_name(&name_of(51)),
            Err(ValidationError::NameTooLong { len: 51 })
        );
    }

    #[test]
    fn name_is_trimmed_before_measuring() {
        assert_eq!(validate_name("   "), Err(ValidationError::NameEmpty));
        assert_eq!(validate_name("  x  "), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name("  Save more  "), Ok("Save more".to_string()));
    }

    #[test]
    fn emoji_counts_as_one_character() {
        let name = format!("🌱{}", "a".repeat(49));
        assert!(validate_name(&name).is_ok());
    }

    #[test]
    fn description_hint_is_advisory() {
        assert!(description_hint("").is_none());
        assert!(description_hint("short").is_some());
        assert!(description_hint("long enough text").is_none());
    }
}
