// Shared enums: StringTokenType, ClosureType

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an enum from its textual name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {name:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub name: String,
}

/// How a label sequence is rendered to (or parsed from) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringTokenType {
    /// Each label is one byte value (1..=255).
    #[default]
    Byte,
    /// Each label is one Unicode scalar value.
    Utf8,
    /// Each label is a symbol table key; symbols are separated by spaces.
    Symbol,
}

impl StringTokenType {
    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            StringTokenType::Byte => "byte",
            StringTokenType::Utf8 => "utf8",
            StringTokenType::Symbol => "symbol",
        }
    }

    /// Whether rendering under this token type needs a symbol table.
    pub fn needs_symbols(self) -> bool {
        matches!(self, StringTokenType::Symbol)
    }
}

impl fmt::Display for StringTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StringTokenType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "byte" => Ok(StringTokenType::Byte),
            "utf8" | "utf-8" => Ok(StringTokenType::Utf8),
            "symbol" => Ok(StringTokenType::Symbol),
            _ => Err(ParseEnumError {
                kind: "string token type",
                name: s.to_string(),
            }),
        }
    }
}

/// Closure flavour: Kleene star (zero or more) or plus (one or more).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClosureType {
    #[default]
    Star,
    Plus,
}

impl ClosureType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClosureType::Star => "star",
            ClosureType::Plus => "plus",
        }
    }
}

impl fmt::Display for ClosureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClosureType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "star" => Ok(ClosureType::Star),
            "plus" => Ok(ClosureType::Plus),
            _ => Err(ParseEnumError {
                kind: "closure type",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_type_defaults_to_byte() {
        assert_eq!(StringTokenType::default(), StringTokenType::Byte);
    }

    #[test]
    fn token_type_parses_names() {
        assert_eq!("byte".parse::<StringTokenType>().unwrap(), StringTokenType::Byte);
        assert_eq!("UTF8".parse::<StringTokenType>().unwrap(), StringTokenType::Utf8);
        assert_eq!("utf-8".parse::<StringTokenType>().unwrap(), StringTokenType::Utf8);
        assert_eq!("symbol".parse::<StringTokenType>().unwrap(), StringTokenType::Symbol);
    }

    #[test]
    fn token_type_rejects_unknown_name() {
        let err = "bytes".parse::<StringTokenType>().unwrap_err();
        assert_eq!(err.name, "bytes");
        assert_eq!(err.to_string(), "unknown string token type: \"bytes\"");
    }

    #[test]
    fn token_type_display_round_trips() {
        for tt in [StringTokenType::Byte, StringTokenType::Utf8, StringTokenType::Symbol] {
            assert_eq!(tt.to_string().parse::<StringTokenType>().unwrap(), tt);
        }
    }

    #[test]
    fn only_symbol_needs_table() {
        assert!(!StringTokenType::Byte.needs_symbols());
        assert!(!StringTokenType::Utf8.needs_symbols());
        assert!(StringTokenType::Symbol.needs_symbols());
    }

    #[test]
    fn closure_type_parses_names() {
        assert_eq!("star".parse::<ClosureType>().unwrap(), ClosureType::Star);
        assert_eq!("Plus".parse::<ClosureType>().unwrap(), ClosureType::Plus);
        assert!("question".parse::<ClosureType>().is_err());
    }
}
