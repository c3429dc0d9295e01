// Type-erased weights.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use fstscript_fst::weight::Semiring;

use crate::ScriptError;
use crate::fst_class::describe;
use crate::registry::{OpRegistry, register_instances};

trait WeightClassImpl: Any + Send + Sync + fmt::Debug + fmt::Display {
    fn weight_type(&self) -> &'static str;
    fn weight_type_name(&self) -> &'static str;
    fn is_zero(&self) -> bool;
    fn box_clone(&self) -> Box<dyn WeightClassImpl>;
    fn as_any(&self) -> &dyn Any;
    fn eq_dyn(&self, other: &dyn WeightClassImpl) -> bool;
}

impl<W: Semiring> WeightClassImpl for W {
    fn weight_type(&self) -> &'static str {
        <W as Semiring>::weight_type()
    }

    fn weight_type_name(&self) -> &'static str {
        std::any::type_name::<W>()
    }

    fn is_zero(&self) -> bool {
        Semiring::is_zero(self)
    }

    fn box_clone(&self) -> Box<dyn WeightClassImpl> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn WeightClassImpl) -> bool {
        other.as_any().downcast_ref::<W>().is_some_and(|o| o == self)
    }
}

/// A weight whose semiring is only known at runtime.
///
/// Equality holds only between weights of the same type.
pub struct WeightClass {
    inner: Box<dyn WeightClassImpl>,
}

type ConstFn = fn() -> WeightClass;
type ParseFn = fn(&str) -> Result<WeightClass, ScriptError>;
type BinaryFn = fn(&WeightClass, &WeightClass) -> Result<WeightClass, ScriptError>;

fn zero_typed<W: Semiring>() -> WeightClass {
    WeightClass::new(W::zero())
}

fn one_typed<W: Semiring>() -> WeightClass {
    WeightClass::new(W::one())
}

fn parse_typed<W: Semiring>(text: &str) -> Result<WeightClass, ScriptError> {
    Ok(WeightClass::new(W::parse(text)?))
}

fn plus_typed<W: Semiring>(lhs: &WeightClass, rhs: &WeightClass) -> Result<WeightClass, ScriptError> {
    let (a, b) = lhs.both::<W>(rhs, "Plus")?;
    Ok(WeightClass::new(a.plus(b)))
}

fn times_typed<W: Semiring>(
    lhs: &WeightClass,
    rhs: &WeightClass,
) -> Result<WeightClass, ScriptError> {
    let (a, b) = lhs.both::<W>(rhs, "Times")?;
    Ok(WeightClass::new(a.times(b)))
}

fn zero_registry() -> &'static OpRegistry<ConstFn> {
    static REGISTRY: OnceLock<OpRegistry<ConstFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_weight_type("Zero");
        register_instances!(registry, zero_typed, weight_type);
        registry
    })
}

fn one_registry() -> &'static OpRegistry<ConstFn> {
    static REGISTRY: OnceLock<OpRegistry<ConstFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_weight_type("One");
        register_instances!(registry, one_typed, weight_type);
        registry
    })
}

fn parse_registry() -> &'static OpRegistry<ParseFn> {
    static REGISTRY: OnceLock<OpRegistry<ParseFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_weight_type("ParseWeight");
        register_instances!(registry, parse_typed, weight_type);
        registry
    })
}

fn plus_registry() -> &'static OpRegistry<BinaryFn> {
    static REGISTRY: OnceLock<OpRegistry<BinaryFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_weight_type("Plus");
        register_instances!(registry, plus_typed, weight_type);
        registry
    })
}

fn times_registry() -> &'static OpRegistry<BinaryFn> {
    static REGISTRY: OnceLock<OpRegistry<BinaryFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_weight_type("Times");
        register_instances!(registry, times_typed, weight_type);
        registry
    })
}

impl WeightClass {
    pub fn new<W: Semiring>(weight: W) -> Self {
        Self {
            inner: Box::new(weight),
        }
    }

    /// The semiring zero of `weight_type`.
    pub fn zero(weight_type: &str) -> Result<Self, ScriptError> {
        Ok(zero_registry().get(weight_type)?())
    }

    /// The semiring one of `weight_type`.
    pub fn one(weight_type: &str) -> Result<Self, ScriptError> {
        Ok(one_registry().get(weight_type)?())
    }

    /// Parses `text` as a weight of `weight_type`.
    pub fn parse(weight_type: &str, text: &str) -> Result<Self, ScriptError> {
        parse_registry().get(weight_type)?(text)
    }

    pub fn weight_type(&self) -> &'static str {
        self.inner.weight_type()
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    /// The concrete weight, if this handle holds a `W`.
    pub fn get_weight<W: Semiring>(&self) -> Option<&W> {
        self.inner.as_any().downcast_ref::<W>()
    }

    pub fn plus(&self, rhs: &WeightClass) -> Result<WeightClass, ScriptError> {
        plus_registry().get(self.weight_type())?(self, rhs)
    }

    pub fn times(&self, rhs: &WeightClass) -> Result<WeightClass, ScriptError> {
        times_registry().get(self.weight_type())?(self, rhs)
    }

    /// Typed view of `self`, failing if it does not hold a `W`.
    pub(crate) fn typed<W: Semiring>(&self, operation: &'static str) -> Result<&W, ScriptError> {
        self.get_weight::<W>()
            .ok_or_else(|| ScriptError::WeightTypeMismatch {
                operation,
                expected: describe(<W as Semiring>::weight_type(), std::any::type_name::<W>()),
                actual: describe(self.weight_type(), self.inner.weight_type_name()),
            })
    }

    fn both<'w, W: Semiring>(
        &'w self,
        rhs: &'w WeightClass,
        operation: &'static str,
    ) -> Result<(&'w W, &'w W), ScriptError> {
        Ok((self.typed::<W>(operation)?, rhs.typed::<W>(operation)?))
    }
}

impl Clone for WeightClass {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.box_clone(),
        }
    }
}

impl PartialEq for WeightClass {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl fmt::Debug for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightClass")
            .field("weight_type", &self.weight_type())
            .field("value", &self.inner)
            .finish()
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
