use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// The name of a doctor or pet.
///
/// Names keep the casing they were entered with, but identity (equality,
/// ordering, hashing) is decided by a case-folded key. `"Rex"` and `"REX"`
/// are the same name.
#[derive(Debug, Clone)]
pub struct Name {
    display: NonEmptyString,
    key: String,
}

impl Name {
    /// Creates a name from the given string.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if the string is empty or contains only
    /// whitespace.
    pub fn new(name: String) -> Result<Self, EmptyNameError> {
        if name.trim().is_empty() {
            return Err(EmptyNameError);
        }
        let key = fold(&name);
        let display = NonEmptyString::new(name).map_err(|_| EmptyNameError)?;
        Ok(Self { display, key })
    }

    /// The name exactly as it was entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.display.as_str()
    }

    /// Whether `other` refers to this name, ignoring case.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.key == fold(other)
    }
}

/// Folds a name into the form used for comparisons.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Name {
    type Err = EmptyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<&str> for Name {
    type Error = EmptyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl TryFrom<String> for Name {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when a name is empty or blank.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
#[error("name must not be empty")]
pub struct EmptyNameError;

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn keeps_original_casing() {
        let name = Name::new("McTavish".to_string()).unwrap();
        assert_eq!(name.as_str(), "McTavish");
        assert_eq!(name.key, "mctavish");
        assert_eq!(name.to_string(), "McTavish");
    }

    #[test]
    fn equality_ignores_case() {
        let a: Name = "Alice".parse().unwrap();
        let b: Name = "aLICE".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert!(a.matches("ALICE"));
        assert!(!a.matches("Alicia"));
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\t\n"; "other whitespace")]
    fn rejects_blank_names(input: &str) {
        assert_eq!(Name::try_from(input), Err(EmptyNameError));
    }

    #[test]
    fn surrounding_whitespace_is_preserved() {
        let name = Name::try_from(" Rex").unwrap();
        assert_eq!(name.as_str(), " Rex");
    }
}
