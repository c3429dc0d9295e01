// Concatenation, union and closure on type-erased automata.

use std::sync::OnceLock;

use fstscript_core::ClosureType;
use fstscript_fst::weight::Semiring;

use crate::registry::{OpRegistry, register_instances};
use crate::{FstClass, ScriptError};

type BinaryFn = fn(&mut FstClass, &FstClass) -> Result<(), ScriptError>;
type ClosureFn = fn(&mut FstClass, ClosureType) -> Result<(), ScriptError>;

fn concat_typed<W: Semiring>(fst1: &mut FstClass, fst2: &FstClass) -> Result<(), ScriptError> {
    let rhs = fst2.typed::<W>("Concat")?;
    fstscript_fst::concat::concat::<W, _, _>(fst1.typed_mut::<W>("Concat")?, rhs)?;
    Ok(())
}

fn union_typed<W: Semiring>(fst1: &mut FstClass, fst2: &FstClass) -> Result<(), ScriptError> {
    let rhs = fst2.typed::<W>("Union")?;
    fstscript_fst::union::union::<W, _, _>(fst1.typed_mut::<W>("Union")?, rhs)?;
    Ok(())
}

fn closure_typed<W: Semiring>(
    fst: &mut FstClass,
    closure_type: ClosureType,
) -> Result<(), ScriptError> {
    fstscript_fst::closure::closure::<W, _>(fst.typed_mut::<W>("Closure")?, closure_type)?;
    Ok(())
}

fn concat_registry() -> &'static OpRegistry<BinaryFn> {
    static REGISTRY: OnceLock<OpRegistry<BinaryFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("Concat");
        register_instances!(registry, concat_typed, arc_type);
        registry
    })
}

fn union_registry() -> &'static OpRegistry<BinaryFn> {
    static REGISTRY: OnceLock<OpRegistry<BinaryFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("Union");
        register_instances!(registry, union_typed, arc_type);
        registry
    })
}

fn closure_registry() -> &'static OpRegistry<ClosureFn> {
    static REGISTRY: OnceLock<OpRegistry<ClosureFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("Closure");
        register_instances!(registry, closure_typed, arc_type);
        registry
    })
}

fn check_arc_types(
    operation: &'static str,
    fst1: &FstClass,
    fst2: &FstClass,
) -> Result<(), ScriptError> {
    if fst1.arc_type() != fst2.arc_type() {
        return Err(ScriptError::ArcTypeMismatch {
            operation,
            expected: fst1.arc_type().to_string(),
            actual: fst2.arc_type().to_string(),
        });
    }
    Ok(())
}

/// Replaces `fst1` by `L(fst1) · L(fst2)`. Both handles must share an arc
/// type.
pub fn concat(fst1: &mut FstClass, fst2: &FstClass) -> Result<(), ScriptError> {
    check_arc_types("Concat", fst1, fst2)?;
    concat_registry().get(fst1.arc_type())?(fst1, fst2)
}

/// Replaces `fst1` by `L(fst1) ∪ L(fst2)`. Both handles must share an arc
/// type.
pub fn union(fst1: &mut FstClass, fst2: &FstClass) -> Result<(), ScriptError> {
    check_arc_types("Union", fst1, fst2)?;
    union_registry().get(fst1.arc_type())?(fst1, fst2)
}

/// Replaces `fst` by its Kleene star or plus.
pub fn closure(fst: &mut FstClass, closure_type: ClosureType) -> Result<(), ScriptError> {
    closure_registry().get(fst.arc_type())?(fst, closure_type)
}
