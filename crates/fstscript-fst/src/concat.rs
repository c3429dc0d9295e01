// Concatenation and bounded-repetition concatenation.

use fstscript_core::ClosureType;
use tracing::debug;

use crate::closure::{closure, optional};
use crate::transition::Transition;
use crate::vector::{Fst, MutableFst, VectorFst, append_states, replace_with};
use crate::weight::Semiring;
use crate::{FstError, StateId};

/// Replaces `fst1` by `L(fst1) · L(fst2)`.
///
/// Final states of `fst1` lose their finality and instead get an epsilon
/// transition, carrying the old final weight, into the copy of `fst2`.
pub fn concat<W, F, G>(fst1: &mut F, fst2: &G) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
    G: Fst<W> + ?Sized,
{
    if fst1.start().is_none() {
        return Ok(());
    }
    let Some(start2) = fst2.start() else {
        fst1.delete_states();
        return Ok(());
    };

    let num_states1 = fst1.num_states() as StateId;
    let offset = append_states(fst1, fst2)?;
    for s in 0..num_states1 {
        let final_weight = fst1.final_weight(s);
        if !final_weight.is_zero() {
            fst1.set_final(s, W::zero())?;
            fst1.add_transition(s, Transition::new(0, 0, final_weight, start2 + offset))?;
        }
    }
    Ok(())
}

/// Replaces `fst` by the concatenation of between `lower` and `upper` copies
/// of itself.
///
/// `upper == 0` means there is no upper bound: the result is
/// `L^lower · L*`, so `(0, 0)` is the Kleene star. For `upper > 0` the result
/// is `L^lower` followed by `upper - lower` nested optional copies,
/// `(L (L (…)?)?)?`, which stays unambiguous when `L` is unambiguous and
/// does not contain the empty string.
///
/// Bounds are validated before anything is touched: `lower > upper` with
/// `upper != 0` returns [`FstError::InvalidRange`] and leaves `fst` as it was.
/// An automaton without a start state is left unchanged.
pub fn concat_range<W, F>(fst: &mut F, lower: u32, upper: u32) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
{
    if upper != 0 && lower > upper {
        return Err(FstError::InvalidRange { lower, upper });
    }
    if fst.start().is_none() {
        return Ok(());
    }
    debug!(lower, upper, states = fst.num_states(), "concat_range");

    let copy: VectorFst<W> = VectorFst::from_fst(&*fst);

    if upper == 0 {
        closure(fst, ClosureType::Star)?;
        for _ in 0..lower {
            prepend(fst, &copy)?;
        }
        return Ok(());
    }

    // Optional tail, built from the innermost copy outwards.
    let mut tail: Option<VectorFst<W>> = None;
    for _ in lower..upper {
        let mut part = copy.clone();
        if let Some(inner) = &tail {
            concat(&mut part, inner)?;
        }
        optional(&mut part)?;
        tail = Some(part);
    }

    if lower == 0 {
        // upper > 0 here, so the loop above ran at least once.
        if let Some(tail) = &tail {
            replace_with(fst, tail)?;
        }
        return Ok(());
    }

    for _ in 1..lower {
        concat(fst, &copy)?;
    }
    if let Some(tail) = &tail {
        concat(fst, tail)?;
    }
    Ok(())
}

/// Replaces `fst` by `L(prefix) · L(fst)`.
fn prepend<W, F>(fst: &mut F, prefix: &VectorFst<W>) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
{
    let mut joined = prefix.clone();
    concat(&mut joined, &*fst)?;
    replace_with(fst, &joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile_string;
    use crate::paths::PathIterator;
    use crate::properties::is_acyclic;
    use crate::string::labels_to_string;
    use crate::weight::TropicalWeight;
    use crate::StringTokenType;

    fn accep(s: &str) -> VectorFst<TropicalWeight> {
        compile_string(s, StringTokenType::Byte, None, TropicalWeight::one()).unwrap()
    }

    fn strings(fst: &VectorFst<TropicalWeight>) -> Vec<String> {
        let mut it = PathIterator::<TropicalWeight>::new(fst);
        assert!(!it.error());
        let mut out = Vec::new();
        while !it.done() {
            out.push(labels_to_string(it.ilabels(), StringTokenType::Byte, None).unwrap());
            it.next();
        }
        out
    }

    /// Whether `fst` accepts `s`, found by walking all epsilon-reachable states.
    fn accepts(fst: &VectorFst<TropicalWeight>, s: &str) -> bool {
        let Some(start) = fst.start() else {
            return false;
        };
        let closure_of = |states: Vec<StateId>| {
            let mut seen = vec![false; fst.num_states()];
            let mut stack = states;
            let mut out = Vec::new();
            while let Some(q) = stack.pop() {
                if seen[q as usize] {
                    continue;
                }
                seen[q as usize] = true;
                out.push(q);
                for tr in fst.transitions(q) {
                    if tr.ilabel == 0 {
                        stack.push(tr.nextstate);
                    }
                }
            }
            out
        };
        let mut current = closure_of(vec![start]);
        for b in s.bytes() {
            let next: Vec<StateId> = current
                .iter()
                .flat_map(|&q| fst.transitions(q))
                .filter(|tr| tr.ilabel == u32::from(b))
                .map(|tr| tr.nextstate)
                .collect();
            current = closure_of(next);
        }
        current.iter().any(|&q| fst.is_final(q))
    }

    #[test]
    fn concat_two_strings() {
        let mut fst = accep("ab");
        concat(&mut fst, &accep("cd")).unwrap();
        assert_eq!(strings(&fst), vec!["abcd"]);
    }

    #[test]
    fn concat_with_empty_language_is_empty() {
        let mut fst = accep("ab");
        concat(&mut fst, &VectorFst::new()).unwrap();
        assert_eq!(fst.start(), None);
    }

    #[test]
    fn concat_keeps_final_weight() {
        let mut fst =
            compile_string("a", StringTokenType::Byte, None, TropicalWeight(2.0)).unwrap();
        let tail = compile_string("b", StringTokenType::Byte, None, TropicalWeight(3.0)).unwrap();
        concat(&mut fst, &tail).unwrap();
        let it = PathIterator::<TropicalWeight>::new(&fst);
        assert_eq!(*it.weight(), TropicalWeight(5.0));
    }

    #[test]
    fn bounded_range_enumerates_each_count_once() {
        let mut fst = accep("a");
        concat_range(&mut fst, 1, 3).unwrap();
        assert!(is_acyclic(&fst));
        assert_eq!(strings(&fst), vec!["a", "aa", "aaa"]);
    }

    #[test]
    fn zero_lower_bound_includes_empty_string() {
        let mut fst = accep("ab");
        concat_range(&mut fst, 0, 2).unwrap();
        assert_eq!(strings(&fst), vec!["", "ab", "abab"]);
    }

    #[test]
    fn exact_repetition() {
        let mut fst = accep("xy");
        concat_range(&mut fst, 2, 2).unwrap();
        assert_eq!(strings(&fst), vec!["xyxy"]);
    }

    #[test]
    fn unbounded_upper_is_star_after_lower_copies() {
        let mut fst = accep("a");
        concat_range(&mut fst, 2, 0).unwrap();
        assert!(!is_acyclic(&fst));
        assert!(!accepts(&fst, ""));
        assert!(!accepts(&fst, "a"));
        assert!(accepts(&fst, "aa"));
        assert!(accepts(&fst, "aaaaa"));
        assert!(!accepts(&fst, "ab"));
    }

    #[test]
    fn default_bounds_are_kleene_star() {
        let mut fst = accep("ab");
        concat_range(&mut fst, 0, 0).unwrap();
        assert!(accepts(&fst, ""));
        assert!(accepts(&fst, "ab"));
        assert!(accepts(&fst, "ababab"));
        assert!(!accepts(&fst, "aba"));
    }

    #[test]
    fn repeated_application_compounds() {
        let mut once = accep("a");
        concat_range(&mut once, 2, 2).unwrap();
        let mut twice = once.clone();
        concat_range(&mut twice, 2, 2).unwrap();
        assert_eq!(strings(&once), vec!["aa"]);
        assert_eq!(strings(&twice), vec!["aaaa"]);
    }

    #[test]
    fn invalid_range_leaves_fst_untouched() {
        let mut fst = accep("ab");
        let before = fst.clone();
        let err = concat_range(&mut fst, 3, 1).unwrap_err();
        assert_eq!(err, FstError::InvalidRange { lower: 3, upper: 1 });
        assert_eq!(fst, before);
    }

    #[test]
    fn empty_fst_is_unchanged() {
        let mut fst: VectorFst<TropicalWeight> = VectorFst::new();
        concat_range(&mut fst, 1, 2).unwrap();
        assert_eq!(fst.num_states(), 0);
        assert!(concat_range(&mut fst, 2, 1).is_err());
    }

    #[test]
    fn repetition_multiplies_weights() {
        let mut fst = compile_string("a", StringTokenType::Byte, None, TropicalWeight(1.0)).unwrap();
        concat_range(&mut fst, 3, 3).unwrap();
        let it = PathIterator::<TropicalWeight>::new(&fst);
        assert_eq!(*it.weight(), TropicalWeight(3.0));
    }
}
