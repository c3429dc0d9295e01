// Rendering and parsing label sequences under a string token type.

use crate::symbols::SymbolTable;
use crate::{EPSILON, FstError, Label, StringTokenType};

/// Renders `labels` as raw bytes.
///
/// Under [`StringTokenType::Byte`] every non-epsilon label must fit in a byte
/// and the bytes are returned as they are, valid UTF-8 or not. The other token
/// types return the UTF-8 encoding of [`labels_to_string`].
pub fn labels_to_bytes(
    labels: &[Label],
    token_type: StringTokenType,
    syms: Option<&SymbolTable>,
) -> Result<Vec<u8>, FstError> {
    match token_type {
        StringTokenType::Byte => labels
            .iter()
            .copied()
            .filter(|&l| l != EPSILON)
            .map(|label| {
                u8::try_from(label).map_err(|_| FstError::UnrenderableLabel { label, token_type })
            })
            .collect(),
        _ => labels_to_string(labels, token_type, syms).map(String::into_bytes),
    }
}

/// Renders `labels` as text.
///
/// Epsilon labels are skipped. Under [`StringTokenType::Byte`] the labels
/// must be byte values; byte sequences that are not UTF-8 are rendered
/// lossily with U+FFFD (use [`labels_to_bytes`] for the exact bytes). Under
/// [`StringTokenType::Utf8`] each label must be a Unicode scalar value; under
/// [`StringTokenType::Symbol`] each label is looked up in `syms` and the
/// names are joined by single spaces.
pub fn labels_to_string(
    labels: &[Label],
    token_type: StringTokenType,
    syms: Option<&SymbolTable>,
) -> Result<String, FstError> {
    match token_type {
        StringTokenType::Byte => {
            let bytes = labels_to_bytes(labels, token_type, syms)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        StringTokenType::Utf8 => labels
            .iter()
            .copied()
            .filter(|&l| l != EPSILON)
            .map(|label| {
                char::from_u32(label).ok_or(FstError::UnrenderableLabel { label, token_type })
            })
            .collect(),
        StringTokenType::Symbol => {
            let syms = syms.ok_or(FstError::MissingSymbolTable(token_type))?;
            let mut out = String::new();
            for label in labels.iter().copied().filter(|&l| l != EPSILON) {
                let symbol = syms
                    .find_symbol(label)
                    .ok_or(FstError::UnrenderableLabel { label, token_type })?;
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(symbol);
            }
            Ok(out)
        }
    }
}

/// Splits `text` into labels; the inverse of [`labels_to_string`].
pub fn string_to_labels(
    text: &str,
    token_type: StringTokenType,
    syms: Option<&SymbolTable>,
) -> Result<Vec<Label>, FstError> {
    match token_type {
        StringTokenType::Byte => Ok(text.bytes().map(Label::from).collect()),
        StringTokenType::Utf8 => Ok(text.chars().map(Label::from).collect()),
        StringTokenType::Symbol => {
            let syms = syms.ok_or(FstError::MissingSymbolTable(token_type))?;
            text.split_whitespace()
                .map(|tok| {
                    syms.find_label(tok)
                        .ok_or_else(|| FstError::UnknownSymbol(tok.to_string()))
                })
                .collect()
        }
    }
}
