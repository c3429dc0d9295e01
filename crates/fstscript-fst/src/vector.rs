// Fst / MutableFst traits and the VectorFst container.

use crate::transition::Transition;
use crate::weight::Semiring;
use crate::{FstError, StateId};

/// Read-only access to a weighted automaton.
///
/// States are numbered densely from `0` to `num_states() - 1`. A state is
/// final when its final weight is not [`Semiring::zero`].
pub trait Fst<W: Semiring> {
    fn start(&self) -> Option<StateId>;

    /// Final weight of `state`; zero for non-final or unknown states.
    fn final_weight(&self, state: StateId) -> W;

    /// Outgoing transitions of `state` in insertion order; empty for unknown states.
    fn transitions(&self, state: StateId) -> &[Transition<W>];

    fn num_states(&self) -> usize;

    fn is_final(&self, state: StateId) -> bool {
        !self.final_weight(state).is_zero()
    }

    fn num_transitions(&self, state: StateId) -> usize {
        self.transitions(state).len()
    }

    /// Total number of transitions over all states.
    fn total_transitions(&self) -> usize {
        (0..self.num_states() as StateId)
            .map(|s| self.num_transitions(s))
            .sum()
    }
}

/// In-place construction and editing of a weighted automaton.
pub trait MutableFst<W: Semiring>: Fst<W> {
    fn add_state(&mut self) -> StateId;

    fn set_start(&mut self, state: StateId) -> Result<(), FstError>;

    fn set_final(&mut self, state: StateId, weight: W) -> Result<(), FstError>;

    /// Adds a transition leaving `state`; both endpoints must exist.
    fn add_transition(&mut self, state: StateId, tr: Transition<W>) -> Result<(), FstError>;

    /// Removes every state (and with them the start state).
    fn delete_states(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
struct VectorState<W> {
    final_weight: W,
    transitions: Vec<Transition<W>>,
}

/// Automaton stored as a vector of states, each owning its transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFst<W> {
    states: Vec<VectorState<W>>,
    start: Option<StateId>,
}

impl<W: Semiring> Default for VectorFst<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> VectorFst<W> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: None,
        }
    }

    /// Deep copy of any other automaton over the same weight.
    pub fn from_fst(other: &(impl Fst<W> + ?Sized)) -> Self {
        let states = (0..other.num_states() as StateId)
            .map(|s| VectorState {
                final_weight: other.final_weight(s),
                transitions: other.transitions(s).to_vec(),
            })
            .collect();
        Self {
            states,
            start: other.start(),
        }
    }

    fn check_state(&self, state: StateId) -> Result<(), FstError> {
        if (state as usize) < self.states.len() {
            Ok(())
        } else {
            Err(FstError::StateOutOfRange {
                state,
                num_states: self.states.len(),
            })
        }
    }
}

impl<W: Semiring> Fst<W> for VectorFst<W> {
    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn final_weight(&self, state: StateId) -> W {
        self.states
            .get(state as usize)
            .map_or_else(W::zero, |s| s.final_weight.clone())
    }

    fn transitions(&self, state: StateId) -> &[Transition<W>] {
        match self.states.get(state as usize) {
            Some(s) => &s.transitions,
            None => &[],
        }
    }

    fn num_states(&self) -> usize {
        self.states.len()
    }
}

impl<W: Semiring> MutableFst<W> for VectorFst<W> {
    fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(VectorState {
            final_weight: W::zero(),
            transitions: Vec::new(),
        });
        id
    }

    fn set_start(&mut self, state: StateId) -> Result<(), FstError> {
        self.check_state(state)?;
        self.start = Some(state);
        Ok(())
    }

    fn set_final(&mut self, state: StateId, weight: W) -> Result<(), FstError> {
        self.check_state(state)?;
        self.states[state as usize].final_weight = weight;
        Ok(())
    }

    fn add_transition(&mut self, state: StateId, tr: Transition<W>) -> Result<(), FstError> {
        self.check_state(state)?;
        self.check_state(tr.nextstate)?;
        self.states[state as usize].transitions.push(tr);
        Ok(())
    }

    fn delete_states(&mut self) {
        self.states.clear();
        self.start = None;
    }
}

/// Copies every state and transition of `src` into `dst`, renumbering states.
///
/// Returns the offset added to `src`'s state ids. The start state of `dst` is
/// left untouched.
pub(crate) fn append_states<W, F, G>(dst: &mut F, src: &G) -> Result<StateId, FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
    G: Fst<W> + ?Sized,
{
    let offset = dst.num_states() as StateId;
    let count = src.num_states() as StateId;
    for _ in 0..count {
        dst.add_state();
    }
    for s in 0..count {
        let target = s + offset;
        dst.set_final(target, src.final_weight(s))?;
        for tr in src.transitions(s) {
            let moved = Transition::new(
                tr.ilabel,
                tr.olabel,
                tr.weight.clone(),
                tr.nextstate + offset,
            );
            dst.add_transition(target, moved)?;
        }
    }
    Ok(offset)
}

/// Replaces the contents of `dst` with a copy of `src`.
pub(crate) fn replace_with<W, F, G>(dst: &mut F, src: &G) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
    G: Fst<W> + ?Sized,
{
    dst.delete_states();
    append_states(dst, src)?;
    if let Some(start) = src.start() {
        dst.set_start(start)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::TropicalWeight;

    fn two_state() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0).unwrap();
        fst.set_final(s1, TropicalWeight(0.5)).unwrap();
        fst.add_transition(s0, Transition::new(97, 98, TropicalWeight(1.0), s1))
            .unwrap();
        fst
    }

    #[test]
    fn build_and_query() {
        let fst = two_state();
        assert_eq!(fst.num_states(), 2);
        assert_eq!(fst.start(), Some(0));
        assert!(!fst.is_final(0));
        assert!(fst.is_final(1));
        assert_eq!(fst.final_weight(1), TropicalWeight(0.5));
        assert_eq!(fst.num_transitions(0), 1);
        assert_eq!(fst.total_transitions(), 1);
        assert_eq!(fst.transitions(0)[0].ilabel, 97);
    }

    #[test]
    fn unknown_states_are_empty_and_non_final() {
        let fst = two_state();
        assert!(fst.transitions(9).is_empty());
        assert!(fst.final_weight(9).is_zero());
    }

    #[test]
    fn reject_out_of_range_state() {
        let mut fst = two_state();
        let err = fst.set_start(2).unwrap_err();
        assert_eq!(
            err,
            FstError::StateOutOfRange {
                state: 2,
                num_states: 2
            }
        );
        assert!(fst
            .add_transition(0, Transition::new(1, 1, TropicalWeight(0.0), 7))
            .is_err());
    }

    #[test]
    fn from_fst_is_deep_copy() {
        let fst = two_state();
        let copy = VectorFst::from_fst(&fst);
        assert_eq!(copy, fst);
    }

    #[test]
    fn append_renumbers_targets() {
        let mut dst = two_state();
        let src = two_state();
        let offset = append_states(&mut dst, &src).unwrap();
        assert_eq!(offset, 2);
        assert_eq!(dst.num_states(), 4);
        assert_eq!(dst.transitions(2)[0].nextstate, 3);
        assert!(dst.is_final(3));
        assert_eq!(dst.start(), Some(0));
    }

    #[test]
    fn delete_states_clears_start() {
        let mut fst = two_state();
        fst.delete_states();
        assert_eq!(fst.num_states(), 0);
        assert_eq!(fst.start(), None);
    }
}
