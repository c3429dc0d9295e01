//! Shared vocabulary for the fstscript crates.
//!
//! Everything here is arc-type independent: label and state identifiers,
//! the string token types used to render label sequences, and the closure
//! kinds accepted by the closure operation.

pub mod enums;

/// Integer symbol identifier carried on either tape of a transition.
pub type Label = u32;

/// Index of a state inside an automaton.
pub type StateId = u32;

/// The reserved empty label.
pub const EPSILON: Label = 0;

pub use enums::{ClosureType, ParseEnumError, StringTokenType};
