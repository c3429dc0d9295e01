// Structural properties.

use crate::vector::Fst;
use crate::weight::Semiring;
use crate::StateId;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

/// Whether the part of `fst` reachable from its start state has no cycle.
///
/// An automaton without a start state is trivially acyclic. Uses an explicit
/// DFS stack so deep automata cannot overflow the call stack.
pub fn is_acyclic<W: Semiring>(fst: &(impl Fst<W> + ?Sized)) -> bool {
    let Some(start) = fst.start() else {
        return true;
    };
    let mut color = vec![Color::White; fst.num_states()];
    // (state, index of the next transition to follow)
    let mut stack: Vec<(StateId, usize)> = vec![(start, 0)];
    color[start as usize] = Color::Grey;

    while let Some(top) = stack.last_mut() {
        let state = top.0;
        if let Some(tr) = fst.transitions(state).get(top.1) {
            top.1 += 1;
            match color[tr.nextstate as usize] {
                Color::Grey => return false,
                Color::White => {
                    color[tr.nextstate as usize] = Color::Grey;
                    stack.push((tr.nextstate, 0));
                }
                Color::Black => {}
            }
        } else {
            color[state as usize] = Color::Black;
            stack.pop();
        }
    }
    true
}

/// Number of states reachable from the start state.
pub fn num_accessible_states<W: Semiring>(fst: &(impl Fst<W> + ?Sized)) -> usize {
    let Some(start) = fst.start() else {
        return 0;
    };
    let mut seen = vec![false; fst.num_states()];
    let mut queue = vec![start];
    seen[start as usize] = true;
    let mut count = 0;
    while let Some(state) = queue.pop() {
        count += 1;
        for tr in fst.transitions(state) {
            let next = tr.nextstate as usize;
            if !seen[next] {
                seen[next] = true;
                queue.push(tr.nextstate);
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Transition;
    use crate::vector::{MutableFst, VectorFst};
    use crate::weight::TropicalWeight;

    fn chain(n: u32) -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        for _ in 0..=n {
            fst.add_state();
        }
        fst.set_start(0).unwrap();
        for s in 0..n {
            fst.add_transition(s, Transition::new(1, 1, TropicalWeight(0.0), s + 1))
                .unwrap();
        }
        fst.set_final(n, TropicalWeight(0.0)).unwrap();
        fst
    }

    #[test]
    fn chain_is_acyclic() {
        assert!(is_acyclic(&chain(5)));
        assert_eq!(num_accessible_states(&chain(5)), 6);
    }

    #[test]
    fn back_edge_is_cycle() {
        let mut fst = chain(3);
        fst.add_transition(3, Transition::new(1, 1, TropicalWeight(0.0), 1))
            .unwrap();
        assert!(!is_acyclic(&fst));
    }

    #[test]
    fn self_loop_is_cycle() {
        let mut fst = chain(1);
        fst.add_transition(1, Transition::new(1, 1, TropicalWeight(0.0), 1))
            .unwrap();
        assert!(!is_acyclic(&fst));
    }

    #[test]
    fn diamond_is_acyclic() {
        let mut fst = chain(2);
        fst.add_transition(0, Transition::new(2, 2, TropicalWeight(0.0), 2))
            .unwrap();
        assert!(is_acyclic(&fst));
    }

    #[test]
    fn unreachable_cycle_is_ignored() {
        let mut fst = chain(1);
        let a = fst.add_state();
        let b = fst.add_state();
        fst.add_transition(a, Transition::new(1, 1, TropicalWeight(0.0), b)).unwrap();
        fst.add_transition(b, Transition::new(1, 1, TropicalWeight(0.0), a)).unwrap();
        assert!(is_acyclic(&fst));
        assert_eq!(num_accessible_states(&fst), 2);
    }

    #[test]
    fn empty_is_acyclic() {
        let fst: VectorFst<TropicalWeight> = VectorFst::new();
        assert!(is_acyclic(&fst));
        assert_eq!(num_accessible_states(&fst), 0);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        assert!(is_acyclic(&chain(100_000)));
    }
}
