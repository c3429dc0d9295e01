// In-place union.

use tracing::trace;

use crate::transition::Transition;
use crate::vector::{Fst, MutableFst, append_states, replace_with};
use crate::weight::Semiring;
use crate::FstError;

/// Replaces `fst1` by an automaton accepting `L(fst1) ∪ L(fst2)`.
///
/// A fresh start state with epsilon transitions to both original start
/// states is added, so paths of `fst1` are enumerated before paths of
/// `fst2`.
pub fn union<W, F, G>(fst1: &mut F, fst2: &G) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
    G: Fst<W> + ?Sized,
{
    let Some(start2) = fst2.start() else {
        return Ok(());
    };
    let Some(start1) = fst1.start() else {
        return replace_with(fst1, fst2);
    };

    let offset = append_states(fst1, fst2)?;
    let new_start = fst1.add_state();
    fst1.add_transition(new_start, Transition::epsilon(start1))?;
    fst1.add_transition(new_start, Transition::epsilon(start2 + offset))?;
    fst1.set_start(new_start)?;
    trace!(states = fst1.num_states(), "union");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::closure;
    use crate::compile::compile_string;
    use crate::paths::PathIterator;
    use crate::vector::VectorFst;
    use crate::weight::TropicalWeight;
    use crate::{StateId, StringTokenType};
    use fstscript_core::ClosureType;

    fn accep(s: &str) -> VectorFst<TropicalWeight> {
        compile_string(s, StringTokenType::Byte, None, TropicalWeight(0.0)).unwrap()
    }

    fn collect(fst: &VectorFst<TropicalWeight>) -> Vec<Vec<u32>> {
        let mut it = PathIterator::<TropicalWeight>::new(fst);
        let mut out = Vec::new();
        while !it.done() {
            out.push(it.ilabels().to_vec());
            it.next();
        }
        out
    }

    #[test]
    fn union_of_two_strings() {
        let mut fst = accep("ab");
        union(&mut fst, &accep("c")).unwrap();
        assert_eq!(collect(&fst), vec![vec![97, 98], vec![99]]);
    }

    #[test]
    fn union_with_empty_operands() {
        let mut fst = accep("ab");
        union(&mut fst, &VectorFst::new()).unwrap();
        assert_eq!(collect(&fst), vec![vec![97, 98]]);

        let mut empty = VectorFst::new();
        union(&mut empty, &accep("x")).unwrap();
        assert_eq!(collect(&empty), vec![vec![120]]);
    }

    /// Accepts new states but refuses to edit any state at or past `cap`.
    struct Capped {
        inner: VectorFst<TropicalWeight>,
        cap: usize,
    }

    impl Capped {
        fn check(&self, state: StateId) -> Result<(), FstError> {
            if (state as usize) < self.cap {
                Ok(())
            } else {
                Err(FstError::StateOutOfRange {
                    state,
                    num_states: self.cap,
                })
            }
        }
    }

    impl Fst<TropicalWeight> for Capped {
        fn start(&self) -> Option<StateId> {
            self.inner.start()
        }

        fn final_weight(&self, state: StateId) -> TropicalWeight {
            self.inner.final_weight(state)
        }

        fn transitions(&self, state: StateId) -> &[Transition<TropicalWeight>] {
            self.inner.transitions(state)
        }

        fn num_states(&self) -> usize {
            self.inner.num_states()
        }
    }

    impl MutableFst<TropicalWeight> for Capped {
        fn add_state(&mut self) -> StateId {
            self.inner.add_state()
        }

        fn set_start(&mut self, state: StateId) -> Result<(), FstError> {
            self.check(state)?;
            self.inner.set_start(state)
        }

        fn set_final(&mut self, state: StateId, weight: TropicalWeight) -> Result<(), FstError> {
            self.check(state)?;
            self.inner.set_final(state, weight)
        }

        fn add_transition(
            &mut self,
            state: StateId,
            tr: Transition<TropicalWeight>,
        ) -> Result<(), FstError> {
            self.check(state)?;
            self.inner.add_transition(state, tr)
        }

        fn delete_states(&mut self) {
            self.inner.delete_states();
        }
    }

    #[test]
    fn state_errors_are_returned() {
        let mut fst = Capped {
            inner: accep("ab"),
            cap: 3,
        };
        assert_eq!(
            union::<TropicalWeight, _, _>(&mut fst, &accep("c")),
            Err(FstError::StateOutOfRange {
                state: 3,
                num_states: 3
            })
        );

        let mut fst = Capped {
            inner: accep("a"),
            cap: 2,
        };
        assert_eq!(
            closure::<TropicalWeight, _>(&mut fst, ClosureType::Star),
            Err(FstError::StateOutOfRange {
                state: 2,
                num_states: 2
            })
        );
    }
}
