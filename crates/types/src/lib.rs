//! # Receitas Types
//!
//! Validated primitives shared by every crate in the workspace.
//!
//! Values of these types can only be built through their constructors, so any
//! `NonEmptyText` or `NationalId` seen elsewhere has already passed validation.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], but maps blank input to `None` instead of an error.
    ///
    /// Used for optional form fields, where leaving the field blank is allowed.
    pub fn optional(input: impl AsRef<str>) -> Option<Self> {
        Self::new(input).ok()
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing a national identifier.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum NationalIdError {
    /// The input contained something other than digits and the usual separators
    #[error("national ID may only contain digits, '.', '-' and spaces")]
    InvalidCharacter,
    /// The input did not contain exactly eleven digits
    #[error("national ID must have exactly {expected} digits, found {found}")]
    WrongLength { expected: usize, found: usize },
}

/// A Brazilian CPF number, stored as eleven bare digits.
///
/// Accepts the punctuated form (`123.456.789-09`) as well as the bare one and
/// normalises to digits only. Check digits are not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NationalId(String);

impl NationalId {
    /// Number of digits in a CPF.
    pub const DIGITS: usize = 11;

    /// Parses a national ID from user input.
    pub fn parse(input: &str) -> Result<Self, NationalIdError> {
        let mut digits = String::with_capacity(Self::DIGITS);
        for c in input.trim().chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' | ' ' => {}
                _ => return Err(NationalIdError::InvalidCharacter),
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(NationalIdError::WrongLength {
                expected: Self::DIGITS,
                found: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the eleven digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NationalId {
    type Err = NationalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for NationalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NationalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NationalId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Maria da Silva  ").unwrap();
        assert_eq!(text.as_str(), "Maria da Silva");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   ").unwrap_err(), TextError::Empty);
        assert!(NonEmptyText::optional("\t").is_none());
    }

    #[test]
    fn national_id_accepts_punctuated_form() {
        let id = NationalId::parse("123.456.789-09").unwrap();
        assert_eq!(id.as_str(), "12345678909");
    }

    #[test]
    fn national_id_rejects_wrong_length() {
        let err = NationalId::parse("1234").unwrap_err();
        assert_eq!(
            err,
            NationalIdError::WrongLength {
                expected: 11,
                found: 4
            }
        );
    }

    #[test]
    fn national_id_rejects_letters() {
        assert_eq!(
            NationalId::parse("123.456.789-0X").unwrap_err(),
            NationalIdError::InvalidCharacter
        );
    }

    #[test]
    fn national_id_serialises_as_bare_digits() {
        let id = NationalId::parse("123 456 789 09").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12345678909\"");
    }
}
