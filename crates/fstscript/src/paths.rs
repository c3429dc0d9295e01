// Type-erased string path iteration.
//
// `StringPathIteratorClass` owns a boxed `StringPathIteratorImplBase`; the
// only implementation wraps the generic `StringPathIterator<'a, W>` for the
// arc type chosen at construction and forwards every call one-to-one,
// widening labels to `i64` and wrapping weights in `WeightClass`.

use std::fmt;
use std::sync::OnceLock;

use fstscript_core::{Label, StringTokenType};
use fstscript_fst::FstError;
use fstscript_fst::paths::{PathStatus, StringPathIterator, StringPathIteratorOptions};
use fstscript_fst::symbols::SymbolTable;
use fstscript_fst::weight::Semiring;

use crate::registry::{OpRegistry, register_instances};
use crate::{FstClass, ScriptError, WeightClass};

/// Operations every arc-type-specific path iterator provides.
///
/// The value forms are the buffer forms writing into a fresh buffer.
pub trait StringPathIteratorImplBase {
    fn done(&self) -> bool;
    fn error(&self) -> bool;
    fn status(&self) -> PathStatus;
    fn last_error(&self) -> Option<FstError>;
    fn ilabels_into(&self, labels: &mut Vec<i64>);
    fn olabels_into(&self, labels: &mut Vec<i64>);
    fn istring_into(&self, out: &mut String);
    fn ostring_into(&self, out: &mut String);
    fn istring_bytes_into(&self, out: &mut Vec<u8>);
    fn ostring_bytes_into(&self, out: &mut Vec<u8>);
    fn weight(&self) -> WeightClass;
    fn next(&mut self);
    fn reset(&mut self);

    fn ilabels(&self) -> Vec<i64> {
        let mut labels = Vec::new();
        self.ilabels_into(&mut labels);
        labels
    }

    fn olabels(&self) -> Vec<i64> {
        let mut labels = Vec::new();
        self.olabels_into(&mut labels);
        labels
    }

    fn istring(&self) -> String {
        let mut out = String::new();
        self.istring_into(&mut out);
        out
    }

    fn ostring(&self) -> String {
        let mut out = String::new();
        self.ostring_into(&mut out);
        out
    }

    fn istring_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.istring_bytes_into(&mut out);
        out
    }

    fn ostring_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.ostring_bytes_into(&mut out);
        out
    }
}

struct StringPathIteratorImpl<'a, W: Semiring> {
    inner: StringPathIterator<'a, W>,
}

fn widen_into(src: &[Label], dst: &mut Vec<i64>) {
    dst.clear();
    dst.extend(src.iter().map(|&label| i64::from(label)));
}

impl<W: Semiring> StringPathIteratorImplBase for StringPathIteratorImpl<'_, W> {
    fn done(&self) -> bool {
        self.inner.done()
    }

    fn error(&self) -> bool {
        self.inner.error()
    }

    fn status(&self) -> PathStatus {
        self.inner.status()
    }

    fn last_error(&self) -> Option<FstError> {
        self.inner.last_error()
    }

    fn ilabels_into(&self, labels: &mut Vec<i64>) {
        widen_into(self.inner.ilabels(), labels);
    }

    fn olabels_into(&self, labels: &mut Vec<i64>) {
        widen_into(self.inner.olabels(), labels);
    }

    fn istring_into(&self, out: &mut String) {
        out.clear();
        out.push_str(self.inner.istring());
    }

    fn ostring_into(&self, out: &mut String) {
        out.clear();
        out.push_str(self.inner.ostring());
    }

    fn istring_bytes_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend_from_slice(self.inner.istring_bytes());
    }

    fn ostring_bytes_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend_from_slice(self.inner.ostring_bytes());
    }

    fn weight(&self) -> WeightClass {
        WeightClass::new(self.inner.weight().clone())
    }

    fn next(&mut self) {
        self.inner.next();
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

type InitFn = for<'a> fn(
    &'a FstClass,
    StringPathIteratorOptions<'a>,
) -> Result<Box<dyn StringPathIteratorImplBase + 'a>, ScriptError>;

fn init_typed<'a, W: Semiring>(
    fst: &'a FstClass,
    options: StringPathIteratorOptions<'a>,
) -> Result<Box<dyn StringPathIteratorImplBase + 'a>, ScriptError> {
    let typed = fst.typed::<W>("InitStringPathIteratorClass")?;
    Ok(Box::new(StringPathIteratorImpl {
        inner: StringPathIterator::new(typed, options),
    }))
}

fn registry() -> &'static OpRegistry<InitFn> {
    static REGISTRY: OnceLock<OpRegistry<InitFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = OpRegistry::by_arc_type("InitStringPathIteratorClass");
        register_instances!(registry, init_typed, arc_type);
        registry
    })
}

/// Cursor over the accepting paths of an [`FstClass`], rendering both tapes
/// as strings.
///
/// The cursor borrows the automaton for its whole lifetime. It starts on the
/// first path; [`done`](Self::done) is true once paths are exhausted or the
/// automaton turned out to be cyclic, so a `while !it.done()` loop always
/// terminates. A label the token type cannot render sets
/// [`error`](Self::error) and leaves that path's strings empty, but later
/// paths are still visited.
///
/// ```
/// use fstscript::{FstClass, StringPathIteratorClass, StringTokenType};
///
/// let fst = FstClass::from_string("hi", "standard", StringTokenType::Byte, None, None)?;
/// let mut it = StringPathIteratorClass::with_token_type(&fst, StringTokenType::Byte, None)?;
/// let mut found = Vec::new();
/// while !it.done() {
///     found.push(it.istring());
///     it.next();
/// }
/// assert_eq!(found, ["hi"]);
/// # Ok::<(), fstscript::ScriptError>(())
/// ```
pub struct StringPathIteratorClass<'a> {
    inner: Box<dyn StringPathIteratorImplBase + 'a>,
    arc_type: &'static str,
}

impl<'a> StringPathIteratorClass<'a> {
    /// Separate token types and symbol tables for the input and output tapes.
    pub fn new(
        fst: &'a FstClass,
        itype: StringTokenType,
        otype: StringTokenType,
        isyms: Option<&'a SymbolTable>,
        osyms: Option<&'a SymbolTable>,
    ) -> Result<Self, ScriptError> {
        let options = StringPathIteratorOptions::new(itype, otype).with_symbols(isyms, osyms);
        Self::with_options(fst, options)
    }

    /// One token type and symbol table for both tapes.
    pub fn with_token_type(
        fst: &'a FstClass,
        token_type: StringTokenType,
        syms: Option<&'a SymbolTable>,
    ) -> Result<Self, ScriptError> {
        Self::with_options(fst, StringPathIteratorOptions::uniform(token_type, syms))
    }

    /// Fails only if the automaton's arc type has no instantiation.
    pub fn with_options(
        fst: &'a FstClass,
        options: StringPathIteratorOptions<'a>,
    ) -> Result<Self, ScriptError> {
        let init = registry().get(fst.arc_type())?;
        Ok(Self {
            inner: init(fst, options)?,
            arc_type: fst.arc_type(),
        })
    }

    pub fn arc_type(&self) -> &'static str {
        self.arc_type
    }

    pub fn done(&self) -> bool {
        self.inner.done()
    }

    pub fn error(&self) -> bool {
        self.inner.error()
    }

    pub fn status(&self) -> PathStatus {
        self.inner.status()
    }

    /// The error behind [`error`](Self::error), if any.
    pub fn last_error(&self) -> Option<FstError> {
        self.inner.last_error()
    }

    /// Copies the current path's input labels into `labels`, replacing its
    /// contents.
    pub fn ilabels_into(&self, labels: &mut Vec<i64>) {
        self.inner.ilabels_into(labels);
    }

    pub fn ilabels(&self) -> Vec<i64> {
        self.inner.ilabels()
    }

    /// Copies the current path's output labels into `labels`, replacing its
    /// contents.
    pub fn olabels_into(&self, labels: &mut Vec<i64>) {
        self.inner.olabels_into(labels);
    }

    pub fn olabels(&self) -> Vec<i64> {
        self.inner.olabels()
    }

    /// Writes the rendered input string into `out`, replacing its contents.
    pub fn istring_into(&self, out: &mut String) {
        self.inner.istring_into(out);
    }

    pub fn istring(&self) -> String {
        self.inner.istring()
    }

    /// Writes the rendered output string into `out`, replacing its contents.
    pub fn ostring_into(&self, out: &mut String) {
        self.inner.ostring_into(out);
    }

    pub fn ostring(&self) -> String {
        self.inner.ostring()
    }

    /// Writes the exact input bytes into `out`, replacing its contents.
    ///
    /// Under [`StringTokenType::Byte`] these may not be UTF-8, in which case
    /// [`istring`](Self::istring) holds a lossy rendering.
    pub fn istring_bytes_into(&self, out: &mut Vec<u8>) {
        self.inner.istring_bytes_into(out);
    }

    pub fn istring_bytes(&self) -> Vec<u8> {
        self.inner.istring_bytes()
    }

    /// Writes the exact output bytes into `out`, replacing its contents.
    pub fn ostring_bytes_into(&self, out: &mut Vec<u8>) {
        self.inner.ostring_bytes_into(out);
    }

    pub fn ostring_bytes(&self) -> Vec<u8> {
        self.inner.ostring_bytes()
    }

    /// Weight of the current path, final weight included.
    pub fn weight(&self) -> WeightClass {
        self.inner.weight()
    }

    /// Advances to the next path; no-op once done.
    pub fn next(&mut self) {
        self.inner.next();
    }

    /// Rewinds to the first path.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl fmt::Debug for StringPathIteratorClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringPathIteratorClass")
            .field("arc_type", &self.arc_type)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::union;
    use fstscript_fst::paths::ErrorPolicy;
    use fstscript_fst::weight::{LogWeight, TropicalWeight};

    fn byte_fst(text: &str, arc_type: &str) -> FstClass {
        FstClass::from_string(text, arc_type, StringTokenType::Byte, None, None).unwrap()
    }

    fn collect(it: &mut StringPathIteratorClass<'_>) -> Vec<String> {
        let mut out = Vec::new();
        while !it.done() {
            out.push(it.istring());
            it.next();
        }
        out
    }

    #[test]
    fn single_path() {
        let fst = byte_fst("ab", "standard");
        let it = StringPathIteratorClass::with_token_type(&fst, StringTokenType::Byte, None)
            .unwrap();
        assert!(!it.done());
        assert!(!it.error());
        assert_eq!(it.ilabels(), vec![97, 98]);
        assert_eq!(it.olabels(), vec![97, 98]);
        assert_eq!(it.ostring(), "ab");
        assert_eq!(it.weight(), WeightClass::new(TropicalWeight(0.0)));
        assert_eq!(it.arc_type(), "standard");
    }

    #[test]
    fn buffer_form_replaces_contents() {
        let fst = byte_fst("xy", "log");
        let it = StringPathIteratorClass::with_token_type(&fst, StringTokenType::Byte, None)
            .unwrap();
        let mut labels = vec![7, 7, 7, 7];
        it.ilabels_into(&mut labels);
        assert_eq!(labels, it.ilabels());
        let mut text = String::from("stale");
        it.ostring_into(&mut text);
        assert_eq!(text, "xy");
        let mut bytes = b"stale".to_vec();
        it.istring_bytes_into(&mut bytes);
        assert_eq!(bytes, b"xy");
        assert_eq!(it.ostring_bytes(), bytes);
    }

    #[test]
    fn weight_keeps_arc_type() {
        let weight = WeightClass::new(LogWeight(1.25));
        let fst = FstClass::from_string("a", "log", StringTokenType::Byte, None, Some(&weight))
            .unwrap();
        let it = StringPathIteratorClass::with_token_type(&fst, StringTokenType::Byte, None)
            .unwrap();
        assert_eq!(it.weight().weight_type(), "log");
        assert_eq!(it.weight(), weight);
    }

    #[test]
    fn enumerates_union() {
        let mut fst = byte_fst("one", "log64");
        union(&mut fst, &byte_fst("two", "log64")).unwrap();
        let mut it = StringPathIteratorClass::with_token_type(&fst, StringTokenType::Byte, None)
            .unwrap();
        assert_eq!(collect(&mut it), vec!["one", "two"]);
        assert!(!it.error());
    }

    #[test]
    fn symbol_type_without_table_is_error() {
        let fst = byte_fst("a", "standard");
        let it = StringPathIteratorClass::new(
            &fst,
            StringTokenType::Symbol,
            StringTokenType::Byte,
            None,
            None,
        )
        .unwrap();
        assert!(it.error());
        assert!(!it.done());
        assert_eq!(it.istring(), "");
        assert_eq!(
            it.last_error(),
            Some(FstError::MissingSymbolTable(StringTokenType::Symbol))
        );
    }

    #[test]
    fn clear_on_reset_policy_is_forwarded() {
        let fst = FstClass::from_string("中", "standard", StringTokenType::Utf8, None, None)
            .unwrap();
        let options = StringPathIteratorOptions::uniform(StringTokenType::Byte, None)
            .with_error_policy(ErrorPolicy::ClearOnReset);
        let mut it = StringPathIteratorClass::with_options(&fst, options).unwrap();
        assert!(it.error());
        assert!(!it.done());
        it.reset();
        // The same path is rendered again, so the error comes back.
        assert!(it.error());
        assert_eq!(it.status(), PathStatus::Errored);
    }
}
