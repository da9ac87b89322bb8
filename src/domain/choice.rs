//! Closed sets of values for enumerated record fields.
//!
//! The values are matched case-insensitively, but the spelling supplied by
//! the user is kept so that it can be written back to disk unchanged.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

/// The kind of animal a pet is, or a doctor specialises in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Dogs.
    Dog,
    /// Cats.
    Cat,
}

impl Species {
    /// All species, in display order.
    pub const ALL: [Self; 2] = [Self::Dog, Self::Cat];

    /// The canonical lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }
}

/// The size class of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    /// Small.
    Small,
    /// Medium.
    Medium,
    /// Large.
    Large,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// The canonical lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// A value from one of the closed sets above.
pub trait Variant: Copy + Eq + Sized + 'static {
    /// Human readable name of the field this value is used for.
    const FIELD: &'static str;

    /// Every legal value.
    fn all() -> &'static [Self];

    /// The canonical lowercase label.
    fn label(self) -> &'static str;

    /// Matches `input` against the labels, ignoring case.
    fn find(input: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|variant| variant.label().eq_ignore_ascii_case(input))
    }
}

impl Variant for Species {
    const FIELD: &'static str = "species";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn label(self) -> &'static str {
        Self::label(self)
    }
}

impl Variant for Size {
    const FIELD: &'static str = "size";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn label(self) -> &'static str {
        Self::label(self)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Species {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| InvalidChoice::new::<Self>(s))
    }
}

impl FromStr for Size {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| InvalidChoice::new::<Self>(s))
    }
}

/// A validated value together with the exact spelling it was parsed from.
///
/// Two choices are equal when their values are equal, regardless of spelling.
#[derive(Debug, Clone)]
pub struct Choice<T> {
    value: T,
    spelling: String,
}

impl<T: Variant> Choice<T> {
    /// Parses a choice, keeping the input spelling.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidChoice`] if `input` does not name a legal value.
    pub fn parse(input: &str) -> Result<Self, InvalidChoice> {
        let value = T::find(input).ok_or_else(|| InvalidChoice::new::<T>(input))?;
        Ok(Self {
            value,
            spelling: input.to_string(),
        })
    }

    /// The validated value.
    #[must_use]
    pub const fn value(&self) -> T {
        self.value
    }

    /// The spelling the value was supplied with.
    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }
}

impl<T: Variant> FromStr for Choice<T> {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T: PartialEq> PartialEq for Choice<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Choice<T> {}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}

impl<T> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.spelling)
    }
}

/// Error returned when a string is not one of the legal values of a field.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("'{value}' is not a valid {field} (expected one of: {expected})")]
pub struct InvalidChoice {
    field: &'static str,
    value: String,
    expected: String,
}

impl InvalidChoice {
    fn new<T: Variant>(value: &str) -> Self {
        let expected = T::all()
            .iter()
            .map(|variant| variant.label())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            field: T::FIELD,
            value: value.to_string(),
            expected,
        }
    }

    /// The name of the field the value was meant for.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("dog", Species::Dog; "lowercase dog")]
    #[test_case("Cat", Species::Cat; "capitalised cat")]
    #[test_case("DOG", Species::Dog; "uppercase dog")]
    fn parses_species(input: &str, expected: Species) {
        let choice: Choice<Species> = input.parse().unwrap();
        assert_eq!(choice.value(), expected);
        assert_eq!(choice.spelling(), input);
    }

    #[test_case("small", Size::Small)]
    #[test_case("Medium", Size::Medium)]
    #[test_case("LARGE", Size::Large)]
    fn parses_size(input: &str, expected: Size) {
        assert_eq!(input.parse::<Size>().unwrap(), expected);
    }

    #[test_case("hamster"; "unknown animal")]
    #[test_case(""; "empty")]
    #[test_case(" dog"; "leading space")]
    fn rejects_unknown_species(input: &str) {
        let error = Choice::<Species>::parse(input).unwrap_err();
        assert_eq!(error.field(), "species");
        assert_eq!(error.value(), input);
    }

    #[test]
    fn error_lists_legal_values() {
        let error = "huge".parse::<Size>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "'huge' is not a valid size (expected one of: small, medium, large)"
        );
    }

    #[test]
    fn equality_ignores_spelling() {
        let a = Choice::<Species>::parse("Cat").unwrap();
        let b = Choice::<Species>::parse("cAT").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.spelling(), b.spelling());
        assert_ne!(a, Choice::<Species>::parse("dog").unwrap());
    }
}
