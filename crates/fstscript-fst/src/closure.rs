// In-place closure and optionality.

use fstscript_core::ClosureType;
use tracing::trace;

use crate::transition::Transition;
use crate::vector::MutableFst;
use crate::weight::Semiring;
use crate::{FstError, StateId};

/// Replaces `fst` by its Kleene star (`L*`) or plus (`L+`).
///
/// Every final state gets an epsilon transition back to the start state,
/// weighted by its final weight. For [`ClosureType::Star`] a new final start
/// state is prepended so the empty string is accepted.
pub fn closure<W, F>(fst: &mut F, closure_type: ClosureType) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
{
    let start = fst.start();
    if let Some(start) = start {
        let num_states = fst.num_states() as StateId;
        for s in 0..num_states {
            let final_weight = fst.final_weight(s);
            if !final_weight.is_zero() {
                fst.add_transition(s, Transition::new(0, 0, final_weight, start))?;
            }
        }
    }
    if closure_type == ClosureType::Star {
        prepend_final_start(fst, start)?;
    }
    trace!(%closure_type, states = fst.num_states(), "closure");
    Ok(())
}

/// Replaces `fst` by `L?`, i.e. `L ∪ {ε}`.
///
/// The new start state is final, so the empty path is enumerated before the
/// paths of `L`.
pub fn optional<W, F>(fst: &mut F) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
{
    let start = fst.start();
    prepend_final_start(fst, start)
}

/// Adds a final start state with an epsilon transition to `start`.
fn prepend_final_start<W, F>(fst: &mut F, start: Option<StateId>) -> Result<(), FstError>
where
    W: Semiring,
    F: MutableFst<W> + ?Sized,
{
    let new_start = fst.add_state();
    fst.set_final(new_start, W::one())?;
    if let Some(start) = start {
        fst.add_transition(new_start, Transition::epsilon(start))?;
    }
    fst.set_start(new_start)
}
