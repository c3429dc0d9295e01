// In-memory transitions and the fixed-size records used by the binary format.

use bytemuck::{Pod, Zeroable};

use crate::weight::Semiring;
use crate::{Label, StateId};

/// A labeled, weighted transition to `nextstate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<W> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
    pub nextstate: StateId,
}

impl<W> Transition<W> {
    pub fn new(ilabel: Label, olabel: Label, weight: W, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }
}

impl<W: Semiring> Transition<W> {
    /// An epsilon transition with unit weight.
    pub fn epsilon(nextstate: StateId) -> Self {
        Self::new(0, 0, W::one(), nextstate)
    }
}

/// Per-state record (16 bytes).
///
/// - `final_bits` (u64): the state's final weight, encoded with
///   [`Semiring::to_bits`]
/// - `num_transitions` (u32): number of [`TransitionRecord`]s belonging to
///   this state, stored contiguously in state order
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct StateRecord {
    pub final_bits: u64,
    pub num_transitions: u32,
    pub _reserved: u32,
}

/// Transition record (24 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransitionRecord {
    pub ilabel: u32,
    pub olabel: u32,
    pub nextstate: u32,
    pub _reserved: u32,
    pub weight_bits: u64,
}

impl TransitionRecord {
    pub fn from_transition<W: Semiring>(tr: &Transition<W>) -> Self {
        Self {
            ilabel: tr.ilabel,
            olabel: tr.olabel,
            nextstate: tr.nextstate,
            _reserved: 0,
            weight_bits: tr.weight.to_bits(),
        }
    }

    pub fn to_transition<W: Semiring>(self) -> Transition<W> {
        Transition::new(
            self.ilabel,
            self.olabel,
            W::from_bits(self.weight_bits),
            self.nextstate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::{LogWeight, TropicalWeight};

    #[test]
    fn record_sizes() {
        assert_eq!(size_of::<StateRecord>(), 16);
        assert_eq!(size_of::<TransitionRecord>(), 24);
    }

    #[test]
    fn epsilon_has_unit_weight() {
        let tr: Transition<TropicalWeight> = Transition::epsilon(4);
        assert_eq!(tr.ilabel, 0);
        assert_eq!(tr.olabel, 0);
        assert_eq!(tr.weight, TropicalWeight(0.0));
        assert_eq!(tr.nextstate, 4);
    }

    #[test]
    fn record_preserves_fields() {
        let tr = Transition::new(97, 120, LogWeight(1.25), 3);
        let rec = TransitionRecord::from_transition(&tr);
        assert_eq!(rec.ilabel, 97);
        assert_eq!(rec.olabel, 120);
        assert_eq!(rec.nextstate, 3);
        assert_eq!(rec.to_transition::<LogWeight>(), tr);
    }
}
