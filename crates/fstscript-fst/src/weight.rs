// Semiring weights: tropical, log, log64

use std::fmt;

use crate::FstError;

/// A weight semiring.
///
/// Implementors define `⊕` ([`plus`](Semiring::plus)), `⊗`
/// ([`times`](Semiring::times)) and their identities. Each weight also names
/// the arc type it induces; that name is the runtime tag the script layer
/// dispatches on.
pub trait Semiring:
    Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static
{
    /// Identity of `plus`, annihilator of `times`.
    fn zero() -> Self;

    /// Identity of `times`.
    fn one() -> Self;

    fn plus(&self, rhs: &Self) -> Self;

    fn times(&self, rhs: &Self) -> Self;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Name of the weight type, e.g. `"tropical"`.
    fn weight_type() -> &'static str;

    /// Name of the arc type built on this weight, e.g. `"standard"`.
    fn arc_type() -> &'static str;

    /// Lossless encoding used by the binary format.
    fn to_bits(&self) -> u64;

    fn from_bits(bits: u64) -> Self;

    /// Parse the textual form produced by `Display`.
    fn parse(text: &str) -> Result<Self, FstError>;
}

/// `-log(exp(-a) + exp(-b))`, stable for large differences.
fn log_plus(a: f64, b: f64) -> f64 {
    if a == f64::INFINITY {
        return b;
    }
    if b == f64::INFINITY {
        return a;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    lo - (-(hi - lo)).exp().ln_1p()
}

fn parse_float(text: &str, weight_type: &'static str) -> Result<f64, FstError> {
    let trimmed = text.trim();
    match trimmed {
        "Infinity" | "inf" | "+inf" => Ok(f64::INFINITY),
        _ => trimmed.parse::<f64>().map_err(|_| FstError::InvalidWeight {
            weight_type,
            text: text.to_string(),
        }),
    }
}

/// Tropical weight over `f32`: `plus` is min, `times` is addition.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TropicalWeight(pub f32);

impl TropicalWeight {
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Semiring for TropicalWeight {
    fn zero() -> Self {
        TropicalWeight(f32::INFINITY)
    }

    fn one() -> Self {
        TropicalWeight(0.0)
    }

    fn plus(&self, rhs: &Self) -> Self {
        TropicalWeight(self.0.min(rhs.0))
    }

    fn times(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        TropicalWeight(self.0 + rhs.0)
    }

    fn weight_type() -> &'static str {
        "tropical"
    }

    fn arc_type() -> &'static str {
        "standard"
    }

    fn to_bits(&self) -> u64 {
        u64::from(self.0.to_bits())
    }

    fn from_bits(bits: u64) -> Self {
        TropicalWeight(f32::from_bits(bits as u32))
    }

    fn parse(text: &str) -> Result<Self, FstError> {
        parse_float(text, Self::weight_type()).map(|v| TropicalWeight(v as f32))
    }
}

impl fmt::Display for TropicalWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f32::INFINITY {
            f.write_str("Infinity")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Log weight over `f32`: `plus` is `-log(e^-a + e^-b)`, `times` is addition.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LogWeight(pub f32);

impl LogWeight {
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Semiring for LogWeight {
    fn zero() -> Self {
        LogWeight(f32::INFINITY)
    }

    fn one() -> Self {
        LogWeight(0.0)
    }

    fn plus(&self, rhs: &Self) -> Self {
        LogWeight(log_plus(f64::from(self.0), f64::from(rhs.0)) as f32)
    }

    fn times(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        LogWeight(self.0 + rhs.0)
    }

    fn weight_type() -> &'static str {
        "log"
    }

    fn arc_type() -> &'static str {
        "log"
    }

    fn to_bits(&self) -> u64 {
        u64::from(self.0.to_bits())
    }

    fn from_bits(bits: u64) -> Self {
        LogWeight(f32::from_bits(bits as u32))
    }

    fn parse(text: &str) -> Result<Self, FstError> {
        parse_float(text, Self::weight_type()).map(|v| LogWeight(v as f32))
    }
}

impl fmt::Display for LogWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f32::INFINITY {
            f.write_str("Infinity")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Log weight over `f64`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Log64Weight(pub f64);

impl Log64Weight {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Semiring for Log64Weight {
    fn zero() -> Self {
        Log64Weight(f64::INFINITY)
    }

    fn one() -> Self {
        Log64Weight(0.0)
    }

    fn plus(&self, rhs: &Self) -> Self {
        Log64Weight(log_plus(self.0, rhs.0))
    }

    fn times(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        Log64Weight(self.0 + rhs.0)
    }

    fn weight_type() -> &'static str {
        "log64"
    }

    fn arc_type() -> &'static str {
        "log64"
    }

    fn to_bits(&self) -> u64 {
        self.0.to_bits()
    }

    fn from_bits(bits: u64) -> Self {
        Log64Weight(f64::from_bits(bits))
    }

    fn parse(text: &str) -> Result<Self, FstError> {
        parse_float(text, Self::weight_type()).map(Log64Weight)
    }
}

impl fmt::Display for Log64Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::INFINITY {
            f.write_str("Infinity")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
