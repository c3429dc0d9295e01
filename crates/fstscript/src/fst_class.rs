// Type-erased mutable automaton handle.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use fstscript_core::{StateId, StringTokenType};
use fstscript_fst::compile::compile_string;
use fstscript_fst::format::{parse_header, read_fst, write_fst};
use fstscript_fst::properties::is_acyclic;
use fstscript_fst::symbols::SymbolTable;
use fstscript_fst::vector::{Fst, VectorFst};
use fstscript_fst::weight::Semiring;
use tracing::debug;

use crate::registry::{OpRegistry, register_instances};
use crate::{ScriptError, WeightClass};

trait FstClassImpl: Any + Send + Sync + fmt::Debug {
    fn arc_type(&self) -> &'static str;
    fn weight_type(&self) -> &'static str;
    /// Rust type name of the weight, told apart from foreign semirings that
    /// reuse a registered tag.
    fn weight_type_name(&self) -> &'static str;
    fn start(&self) -> Option<StateId>;
    fn num_states(&self) -> usize;
    fn num_transitions(&self) -> usize;
    fn is_acyclic(&self) -> bool;
    fn write(&self) -> Vec<u8>;
    fn box_clone(&self) -> Box<dyn FstClassImpl>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<W: Semiring> FstClassImpl for VectorFst<W> {
    fn arc_type(&self) -> &'static str {
        <W as Semiring>::arc_type()
    }

    fn weight_type(&self) -> &'static str {
        <W as Semiring>::weight_type()
    }

    fn weight_type_name(&self) -> &'static str {
        std::any::type_name::<W>()
    }

    fn start(&self) -> Option<StateId> {
        Fst::start(self)
    }

    fn num_states(&self) -> usize {
        Fst::num_states(self)
    }

    fn num_transitions(&self) -> usize {
        Fst::total_transitions(self)
    }

    fn is_acyclic(&self) -> bool {
        is_acyclic::<W>(self)
    }

    fn write(&self) -> Vec<u8> {
        write_fst::<W>(self)
    }

    fn box_clone(&self) -> Box<dyn FstClassImpl> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A mutable weighted automaton whose arc type is only known at runtime.
///
/// The handle owns a `VectorFst<W>` for one supported semiring `W`. Script
/// operations read [`arc_type`](Self::arc_type) to pick the matching
/// instantiation and then work on the concrete automaton in place.
pub struct FstClass {
    inner: Box<dyn FstClassImpl>,
}

type CreateFn = fn() -> FstClass;
type ReadFn = fn(&[u8]) -> Result<FstClass, ScriptError>;
type CompileFn = fn(
    &str,
    StringTokenType,
    Option<&SymbolTable>,
    Option<&WeightClass>,
) -> Result<FstClass, ScriptError>;

fn create_typed<W: Semiring>() -> FstClass {
    FstClass::from_fst(VectorFst::<W>::new())
}

fn read_typed<W: Semiring>(data: &[u8]) -> Result<FstClass, ScriptError> {
    Ok(FstClass::from_fst(read_fst::<W>(data)?))
}

fn compile_typed<W: Semiring>(
    text: &str,
    token_type: StringTokenType,
    syms: Option<&SymbolTable>,
    weight: Option<&WeightClass>,
) -> Result<FstClass, ScriptError> {
    let weight = match weight {
        Some(weight) => weight.typed::<W>("CompileString")?.clone(),
        None => W::one(),
    };
    Ok(FstClass::from_fst(compile_string::<W>(
        text, token_type, syms, weight,
    )?))
}

fn create_registry() -> &'static OpRegistry<CreateFn> {
    static REGISTRY: OnceLock<OpRegistry<CreateFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("CreateFst");
        register_instances!(registry, create_typed, arc_type);
        registry
    })
}

fn read_registry() -> &'static OpRegistry<ReadFn> {
    static REGISTRY: OnceLock<OpRegistry<ReadFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("ReadFst");
        register_instances!(registry, read_typed, arc_type);
        registry
    })
}

fn compile_registry() -> &'static OpRegistry<CompileFn> {
    static REGISTRY: OnceLock<OpRegistry<CompileFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("CompileString");
        register_instances!(registry, compile_typed, arc_type);
        registry
    })
}

/// Arc types every script operation is instantiated for, sorted.
pub fn arc_types() -> Vec<&'static str> {
    create_registry().keys()
}

impl FstClass {
    /// Wraps a concrete automaton.
    pub fn from_fst<W: Semiring>(fst: VectorFst<W>) -> Self {
        Self {
            inner: Box::new(fst),
        }
    }

    /// An empty automaton (no states) of the given arc type.
    pub fn new(arc_type: &str) -> Result<Self, ScriptError> {
        Ok(create_registry().get(arc_type)?())
    }

    /// Compiles `text` into a linear acceptor of the given arc type.
    ///
    /// The path weight defaults to one; a supplied `weight` must match the
    /// arc type's weight type.
    pub fn from_string(
        text: &str,
        arc_type: &str,
        token_type: StringTokenType,
        syms: Option<&SymbolTable>,
        weight: Option<&WeightClass>,
    ) -> Result<Self, ScriptError> {
        compile_registry().get(arc_type)?(text, token_type, syms, weight)
    }

    /// Deserializes an automaton, choosing the arc type recorded in the
    /// header.
    pub fn read(data: &[u8]) -> Result<Self, ScriptError> {
        let header = parse_header(data)?;
        debug!(
            arc_type = %header.arc_type,
            num_states = header.num_states,
            num_transitions = header.num_transitions,
            "reading fst"
        );
        read_registry().get(&header.arc_type)?(data)
    }

    pub fn write(&self) -> Vec<u8> {
        self.inner.write()
    }

    /// Runtime tag naming the arc type, e.g. `"standard"`.
    pub fn arc_type(&self) -> &'static str {
        self.inner.arc_type()
    }

    pub fn weight_type(&self) -> &'static str {
        self.inner.weight_type()
    }

    pub fn start(&self) -> Option<StateId> {
        self.inner.start()
    }

    pub fn num_states(&self) -> usize {
        self.inner.num_states()
    }

    pub fn num_transitions(&self) -> usize {
        self.inner.num_transitions()
    }

    pub fn is_acyclic(&self) -> bool {
        self.inner.is_acyclic()
    }

    /// The concrete automaton, if this handle holds a `VectorFst<W>`.
    pub fn get_fst<W: Semiring>(&self) -> Option<&VectorFst<W>> {
        self.inner.as_any().downcast_ref::<VectorFst<W>>()
    }

    /// Mutable access to the concrete automaton.
    pub fn get_mutable_fst<W: Semiring>(&mut self) -> Option<&mut VectorFst<W>> {
        self.inner.as_any_mut().downcast_mut::<VectorFst<W>>()
    }

    pub(crate) fn typed<W: Semiring>(
        &self,
        operation: &'static str,
    ) -> Result<&VectorFst<W>, ScriptError> {
        let actual = (self.arc_type(), self.inner.weight_type_name());
        self.get_fst::<W>()
            .ok_or_else(|| mismatch::<W>(operation, actual))
    }

    pub(crate) fn typed_mut<W: Semiring>(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut VectorFst<W>, ScriptError> {
        let actual = (self.arc_type(), self.inner.weight_type_name());
        self.get_mutable_fst::<W>()
            .ok_or_else(|| mismatch::<W>(operation, actual))
    }
}

fn mismatch<W: Semiring>(
    operation: &'static str,
    (arc_type, type_name): (&'static str, &'static str),
) -> ScriptError {
    ScriptError::ArcTypeMismatch {
        operation,
        expected: describe(W::arc_type(), std::any::type_name::<W>()),
        actual: describe(arc_type, type_name),
    }
}

/// `standard (fstscript_fst::weight::TropicalWeight)`
pub(crate) fn describe(tag: &str, type_name: &str) -> String {
    format!("{tag} ({type_name})")
}

impl Clone for FstClass {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.box_clone(),
        }
    }
}

impl fmt::Debug for FstClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FstClass")
            .field("arc_type", &self.arc_type())
            .field("num_states", &self.num_states())
            .field("num_transitions", &self.num_transitions())
            .finish()
    }
}
