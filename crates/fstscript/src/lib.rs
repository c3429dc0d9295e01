//! Type-erased script layer over `fstscript-fst`.
//!
//! Callers that only know an automaton's arc type at runtime work with the
//! non-generic handles in this crate: [`FstClass`], [`WeightClass`] and
//! [`StringPathIteratorClass`]. Each operation looks up the instantiation
//! matching the handle's arc-type tag in a per-operation [`OpRegistry`],
//! recovers the concrete `VectorFst<W>` and forwards to the generic
//! algorithm.
//!
//! # Architecture
//!
//! - [`registry`] -- Per-operation dispatch tables keyed by arc or weight type
//! - [`fst_class`] -- `FstClass`, the type-erased automaton handle
//! - [`weight_class`] -- `WeightClass`, the type-erased weight
//! - [`concat_range`] -- Bounded-repetition concatenation
//! - [`ops`] -- Concatenation, union and closure
//! - [`paths`] -- `StringPathIteratorClass`, the type-erased path cursor

pub mod concat_range;
pub mod fst_class;
pub mod ops;
pub mod paths;
pub mod registry;
pub mod weight_class;

pub use concat_range::{ConcatRangeArgs, concat_range, concat_range_with};
pub use fst_class::FstClass;
pub use fstscript_core::{ClosureType, Label, StringTokenType};
pub use fstscript_fst::FstError;
pub use fstscript_fst::paths::{ErrorPolicy, PathStatus, StringPathIteratorOptions};
pub use fstscript_fst::symbols::SymbolTable;
pub use ops::{closure, concat, union};
pub use paths::StringPathIteratorClass;
pub use registry::OpRegistry;
pub use weight_class::WeightClass;

/// Error type for script-level dispatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// No instantiation of `operation` is registered for the handle's arc type.
    #[error("{operation}: no instantiation for arc type {arc_type:?}")]
    UnsupportedArcType {
        operation: &'static str,
        arc_type: String,
    },

    /// No instantiation of `operation` is registered for the weight type.
    #[error("{operation}: no instantiation for weight type {weight_type:?}")]
    UnsupportedWeightType {
        operation: &'static str,
        weight_type: String,
    },

    /// Two handles passed to one operation disagree on their arc type.
    #[error("{operation}: arc types do not match ({expected} vs {actual})")]
    ArcTypeMismatch {
        operation: &'static str,
        expected: String,
        actual: String,
    },

    /// Two weights passed to one operation disagree on their weight type.
    #[error("{operation}: weight types do not match ({expected} vs {actual})")]
    WeightTypeMismatch {
        operation: &'static str,
        expected: String,
        actual: String,
    },

    /// The generic operation itself failed.
    #[error(transparent)]
    Fst(#[from] FstError),
}
