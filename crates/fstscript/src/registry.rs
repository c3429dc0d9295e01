// Per-operation dispatch tables.
//
// Every script operation owns one `OpRegistry`, lazily built on first use
// and filled with one monomorphized function per supported semiring by
// `register_instances!`. Lookups are keyed by the arc-type (or weight-type)
// tag read from the handle.

use hashbrown::HashMap;
use tracing::debug;

use crate::ScriptError;

/// What the registry's keys name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKey {
    ArcType,
    WeightType,
}

/// Dispatch table for one operation.
///
/// `F` is the operation's function-pointer type; every instantiation shares
/// it, so callers get one signature regardless of arc type.
pub struct OpRegistry<F: Copy> {
    operation: &'static str,
    key: RegistryKey,
    table: HashMap<&'static str, F>,
}

impl<F: Copy> std::fmt::Debug for OpRegistry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpRegistry")
            .field("operation", &self.operation)
            .field("key", &self.key)
            .field("keys", &self.keys())
            .finish()
    }
}

impl<F: Copy> OpRegistry<F> {
    /// A registry keyed by arc type.
    pub fn by_arc_type(operation: &'static str) -> Self {
        Self {
            operation,
            key: RegistryKey::ArcType,
            table: HashMap::new(),
        }
    }

    /// A registry keyed by weight type.
    pub fn by_weight_type(operation: &'static str) -> Self {
        Self {
            operation,
            key: RegistryKey::WeightType,
            table: HashMap::new(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Registers `op` under `key`, replacing any earlier entry.
    pub fn register(&mut self, key: &'static str, op: F) {
        self.table.insert(key, op);
    }

    /// Looks up the instantiation for `key`.
    pub fn get(&self, key: &str) -> Result<F, ScriptError> {
        debug!(operation = self.operation, key, "dispatch");
        self.table.get(key).copied().ok_or_else(|| match self.key {
            RegistryKey::ArcType => ScriptError::UnsupportedArcType {
                operation: self.operation,
                arc_type: key.to_string(),
            },
            RegistryKey::WeightType => ScriptError::UnsupportedWeightType {
                operation: self.operation,
                weight_type: key.to_string(),
            },
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.table.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

/// Registers `$op::<W>` for every supported semiring `W`, keyed by
/// `W::arc_type()` or `W::weight_type()`.
macro_rules! register_instances {
    ($registry:expr, $op:ident, $key:ident) => {{
        use fstscript_fst::weight::{Log64Weight, LogWeight, Semiring, TropicalWeight};
        $registry.register(<TropicalWeight as Semiring>::$key(), $op::<TropicalWeight> as _);
        $registry.register(<LogWeight as Semiring>::$key(), $op::<LogWeight> as _);
        $registry.register(<Log64Weight as Semiring>::$key(), $op::<Log64Weight> as _);
    }};
}

pub(crate) use register_instances;
