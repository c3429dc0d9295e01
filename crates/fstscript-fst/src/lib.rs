//! Generic weighted finite-state transducers.
//!
//! This crate holds the arc-type-parameterized half of fstscript: every
//! algorithm here is generic over a [`Semiring`](weight::Semiring) and is
//! monomorphized once per supported arc type by the script layer.
//!
//! # Architecture
//!
//! - [`weight`] -- Semiring trait and the tropical/log/log64 weights
//! - [`transition`] -- In-memory transitions and their on-disk record layout
//! - [`vector`] -- `Fst`/`MutableFst` traits and the `VectorFst` container
//! - [`symbols`] -- Symbol table (label-to-string and string-to-label)
//! - [`string`] -- Rendering and parsing label sequences under a token type
//! - [`compile`] -- Compiling strings into linear automata
//! - [`union`], [`concat`], [`closure`] -- In-place rational operations
//! - [`properties`] -- Structural checks (acyclicity)
//! - [`paths`] -- Depth-first path enumeration with string projections
//! - [`format`] -- Binary serialization tagged with the arc type

pub mod closure;
pub mod compile;
pub mod concat;
pub mod format;
pub mod paths;
pub mod properties;
pub mod string;
pub mod symbols;
pub mod transition;
pub mod union;
pub mod vector;
pub mod weight;

pub use fstscript_core::{EPSILON, Label, StateId, StringTokenType};

/// Error type for generic FST construction, algorithms and serialization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FstError {
    #[error("invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange { lower: u32, upper: u32 },
    #[error("state {state} out of range (automaton has {num_states} states)")]
    StateOutOfRange { state: StateId, num_states: usize },
    #[error("automaton is cyclic; its paths cannot be enumerated")]
    Cyclic,
    #[error("label {label} cannot be rendered with token type {token_type}")]
    UnrenderableLabel {
        label: Label,
        token_type: StringTokenType,
    },
    #[error("token type {0} requires a symbol table")]
    MissingSymbolTable(StringTokenType),
    #[error("symbol {0:?} not found in symbol table")]
    UnknownSymbol(String),
    #[error("invalid {weight_type} weight: {text:?}")]
    InvalidWeight {
        weight_type: &'static str,
        text: String,
    },
    #[error("invalid magic number in FST header")]
    InvalidMagic,
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("unsupported FST format version {0}")]
    UnsupportedVersion(u16),
    #[error("arc type mismatch: expected {expected}, got {actual}")]
    ArcTypeMismatch { expected: String, actual: String },
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("corrupt FST data: {0}")]
    Corrupt(String),
}
