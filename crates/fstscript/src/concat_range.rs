// Bounded-repetition concatenation on a type-erased automaton.

use std::sync::OnceLock;

use fstscript_fst::weight::Semiring;

use crate::registry::{OpRegistry, register_instances};
use crate::{FstClass, ScriptError};

/// Repetition bounds for [`concat_range_with`].
///
/// `upper == 0` means unbounded. The default `(0, 0)` is the Kleene star.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatRangeArgs {
    pub lower: u32,
    pub upper: u32,
}

impl ConcatRangeArgs {
    pub fn new(lower: u32, upper: u32) -> Self {
        Self { lower, upper }
    }

    pub fn is_bounded(&self) -> bool {
        self.upper != 0
    }
}

type ConcatRangeFn = fn(&mut FstClass, ConcatRangeArgs) -> Result<(), ScriptError>;

fn concat_range_typed<W: Semiring>(
    fst: &mut FstClass,
    args: ConcatRangeArgs,
) -> Result<(), ScriptError> {
    let typed = fst.typed_mut::<W>("ConcatRange")?;
    fstscript_fst::concat::concat_range::<W, _>(typed, args.lower, args.upper)?;
    Ok(())
}

fn registry() -> &'static OpRegistry<ConcatRangeFn> {
    static REGISTRY: OnceLock<OpRegistry<ConcatRangeFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("ConcatRange");
        register_instances!(registry, concat_range_typed, arc_type);
        registry
    })
}

/// Replaces `fst` in place by between `lower` and `upper` concatenated copies
/// of itself (`upper == 0`: at least `lower`, no maximum).
///
/// Fails with [`ScriptError::UnsupportedArcType`] if the handle's arc type
/// has no instantiation, and with [`crate::FstError::InvalidRange`] if
/// `lower > upper` for a bounded range. On failure `fst` is unchanged.
pub fn concat_range(fst: &mut FstClass, lower: u32, upper: u32) -> Result<(), ScriptError> {
    concat_range_with(fst, ConcatRangeArgs::new(lower, upper))
}

/// [`concat_range`] taking the bounds as one argument bundle.
pub fn concat_range_with(fst: &mut FstClass, args: ConcatRangeArgs) -> Result<(), ScriptError> {
    let op = registry().get(fst.arc_type())?;
    op(fst, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FstError;
    use fstscript_core::StringTokenType;
    use fstscript_fst::weight::LogWeight;

    fn byte_fst(text: &str, arc_type: &str) -> FstClass {
        FstClass::from_string(text, arc_type, StringTokenType::Byte, None, None).unwrap()
    }

    #[test]
    fn default_args_are_star() {
        let args = ConcatRangeArgs::default();
        assert_eq!(args, ConcatRangeArgs::new(0, 0));
        assert!(!args.is_bounded());
    }

    #[test]
    fn dispatches_on_every_arc_type() {
        for arc_type in ["standard", "log", "log64"] {
            let mut fst = byte_fst("a", arc_type);
            concat_range(&mut fst, 1, 2).unwrap();
            assert_eq!(fst.arc_type(), arc_type);
            assert!(fst.num_states() > 2);
        }
    }

    #[test]
    fn invalid_range_leaves_fst_untouched() {
        let mut fst = byte_fst("ab", "log");
        let before = fst.get_fst::<LogWeight>().unwrap().clone();
        let err = concat_range(&mut fst, 3, 1).unwrap_err();
        assert_eq!(err, ScriptError::Fst(FstError::InvalidRange { lower: 3, upper: 1 }));
        assert_eq!(fst.get_fst::<LogWeight>(), Some(&before));
    }

    #[test]
    fn unbounded_upper_keeps_cycle() {
        let mut fst = byte_fst("a", "standard");
        concat_range_with(&mut fst, ConcatRangeArgs::new(2, 0)).unwrap();
        assert!(!fst.is_acyclic());
    }
}
