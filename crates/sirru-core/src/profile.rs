//! Onboarding profile: a nickname and a home region.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::pulse::region;

pub const NICKNAME_MIN_CHARS: usize = 2;
pub const NICKNAME_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub nickname: String,
    pub region: String,
}

impl Profile {
    /// Validate and build a profile. The nickname is trimmed first.
    pub fn new(nickname: &str, region_code: &str) -> Result<Self, ValidationError> {
        let nickname = nickname.trim();
        let chars = nickname.chars().count();
        if chars < NICKNAME_MIN_CHARS {
            return Err(ValidationError::NicknameTooShort {
                min: NICKNAME_MIN_CHARS,
            });
        }
        if chars > NICKNAME_MAX_CHARS {
            return Err(ValidationError::NicknameTooLong {
                max: NICKNAME_MAX_CHARS,
            });
        }
        let region = region(region_code)?;
        Ok(Self {
            nickname: nickname.to_string(),
            region: region.code.to_string(),
        })
    }

    pub fn region_name(&self) -> &'static str {
        region(&self.region).map(|r| r.name).unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts() {
        let p = Profile::new("  reef  ", "K").unwrap();
        assert_eq!(p.nickname, "reef");
        assert_eq!(p.region_name(), "Kaafu (Malé)");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(Profile::new("🐢🐢", "K").is_ok());
        assert_eq!(
            Profile::new(" a ", "K").unwrap_err(),
            ValidationError::NicknameTooShort { min: 2 }
        );
        assert_eq!(
            Profile::new(&"x".repeat(21), "K").unwrap_err(),
            ValidationError::NicknameTooLong { max: 20 }
        );
    }

    #[test]
    fn unknown_region_is_rejected() {
        assert_eq!(
            Profile::new("reef", "Q").unwrap_err(),
            ValidationError::UnknownRegion("Q".into())
        );
    }
}
