//! Advisor profile: the sender's credentials and deal history, embedded in every prompt.
//!
//! Loading never fails: a missing, empty or unreadable file falls back to a
//! generic one-line profile so generation can still run.

use std::path::Path;

use tracing::warn;

pub const DEFAULT_PROFILE_PATH: &str = "data/advisor_profile.txt";

pub const FALLBACK_PROFILE: &str =
    "Experienced M&A advisor with diverse deal experience across multiple industries.";

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorProfile {
    text: String,
    fallback: bool,
}

impl AdvisorProfile {
    /// Reads and trims the profile at `path`, or substitutes [`FALLBACK_PROFILE`].
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    warn!("Advisor profile at {} is empty, using fallback", path.display());
                    return Self::fallback();
                }
                Self {
                    text: trimmed.to_string(),
                    fallback: false,
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Advisor profile not found at {}, using fallback", path.display());
                Self::fallback()
            }
            Err(e) => {
                warn!(
                    "Failed to read advisor profile at {}: {e}; using fallback",
                    path.display()
                );
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_PROFILE.to_string(),
            fallback: true,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_returns_trimmed_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  Closed 40 lower-middle-market deals in industrials.  \n").unwrap();

        let profile = AdvisorProfile::load(file.path());
        assert_eq!(
            profile.as_str(),
            "Closed 40 lower-middle-market deals in industrials."
        );
        assert!(!profile.is_fallback());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let profile = AdvisorProfile::load(dir.path().join("nope.txt"));
        assert_eq!(profile.as_str(), FALLBACK_PROFILE);
        assert!(profile.is_fallback());
    }

    #[test]
    fn test_whitespace_only_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t  ").unwrap();
        let profile = AdvisorProfile::load(file.path());
        assert!(profile.is_fallback());
    }

    #[test]
    fn test_unreadable_path_falls_back() {
        // A directory cannot be read as a string.
        let dir = tempfile::tempdir().unwrap();
        let profile = AdvisorProfile::load(dir.path());
        assert_eq!(profile.as_str(), FALLBACK_PROFILE);
    }

    #[test]
    fn test_invalid_utf8_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
        let profile = AdvisorProfile::load(file.path());
        assert!(profile.is_fallback());
    }
}
