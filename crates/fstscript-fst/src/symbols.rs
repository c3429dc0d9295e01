// Symbol table: label-to-string and string-to-label mapping.

use hashbrown::HashMap;

use crate::{FstError, Label};

/// Conventional name of the epsilon symbol.
pub const EPSILON_SYMBOL: &str = "<epsilon>";

/// Bidirectional mapping between labels and symbol names.
///
/// Labels need not be dense. [`add_symbol`](SymbolTable::add_symbol) hands out
/// the next key above the largest one seen so far.
///
/// The text form is one `symbol<TAB>label` pair per line; any run of
/// whitespace is accepted as the separator when parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    name: String,
    symbols: HashMap<Label, String>,
    labels: HashMap<String, Label>,
    available_key: Label,
}

impl SymbolTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A table with [`EPSILON_SYMBOL`] bound to label 0.
    pub fn with_epsilon(name: impl Into<String>) -> Self {
        let mut table = Self::new(name);
        table.add_symbol(EPSILON_SYMBOL);
        table
    }

    /// Builds a table with epsilon at 0 followed by `symbols` at 1, 2, ...
    pub fn from_symbols<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::with_epsilon(name);
        for sym in symbols {
            table.add_symbol(sym.as_ref());
        }
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Adds `symbol` under the next available key, or returns its existing label.
    pub fn add_symbol(&mut self, symbol: &str) -> Label {
        if let Some(&label) = self.labels.get(symbol) {
            return label;
        }
        let label = self.available_key;
        self.insert(symbol, label);
        label
    }

    /// Binds `symbol` to an explicit `label`.
    ///
    /// Rebinding an existing symbol or label to a different partner is an error.
    pub fn add_symbol_with_label(&mut self, symbol: &str, label: Label) -> Result<(), FstError> {
        match (self.labels.get(symbol), self.symbols.get(&label)) {
            (Some(&l), _) if l == label => Ok(()),
            (Some(&l), _) => Err(FstError::InvalidSymbolTable(format!(
                "symbol {symbol:?} already bound to label {l}"
            ))),
            (None, Some(existing)) => Err(FstError::InvalidSymbolTable(format!(
                "label {label} already bound to symbol {existing:?}"
            ))),
            (None, None) => {
                self.insert(symbol, label);
                Ok(())
            }
        }
    }

    fn insert(&mut self, symbol: &str, label: Label) {
        self.symbols.insert(label, symbol.to_string());
        self.labels.insert(symbol.to_string(), label);
        if label >= self.available_key {
            self.available_key = label + 1;
        }
    }

    pub fn find_symbol(&self, label: Label) -> Option<&str> {
        self.symbols.get(&label).map(String::as_str)
    }

    pub fn find_label(&self, symbol: &str) -> Option<Label> {
        self.labels.get(symbol).copied()
    }

    pub fn contains_label(&self, label: Label) -> bool {
        self.symbols.contains_key(&label)
    }

    /// `(label, symbol)` pairs in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        let mut pairs: Vec<(Label, &str)> = self
            .symbols
            .iter()
            .map(|(&l, s)| (l, s.as_str()))
            .collect();
        pairs.sort_unstable_by_key(|&(l, _)| l);
        pairs.into_iter()
    }

    /// Parses the text form.
    pub fn parse_text(name: impl Into<String>, text: &str) -> Result<Self, FstError> {
        let mut table = Self::new(name);
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(symbol), Some(label), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(FstError::InvalidSymbolTable(format!(
                    "line {}: expected `symbol label`, got {line:?}",
                    line_no + 1
                )));
            };
            let label: Label = label.parse().map_err(|_| {
                FstError::InvalidSymbolTable(format!(
                    "line {}: invalid label {label:?}",
                    line_no + 1
                ))
            })?;
            table.add_symbol_with_label(symbol, label)?;
        }
        Ok(table)
    }

    /// Renders the text form, ordered by label.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (label, symbol) in self.iter() {
            out.push_str(symbol);
            out.push('\t');
            out.push_str(&label.to_string());
            out.push('\n');
        }
        out
    }
}
