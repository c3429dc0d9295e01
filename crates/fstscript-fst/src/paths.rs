// Depth-first path enumeration over acyclic automata.
//
// The traversal keeps an explicit DFS stack: one frame per state on the
// current path, each remembering which outgoing transition to follow next
// and whether the state's own finality has been reported yet. A path is
// yielded whenever a frame reports a non-zero final weight.

use std::fmt;

use tracing::{trace, warn};

use crate::properties::is_acyclic;
use crate::string::labels_to_bytes;
use crate::symbols::SymbolTable;
use crate::vector::Fst;
use crate::weight::Semiring;
use crate::{EPSILON, FstError, Label, StateId, StringTokenType};

/// Whether [`StringPathIterator::reset`] forgets a previously reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Errors survive `reset` for the cursor's whole lifetime.
    #[default]
    Sticky,
    /// `reset` clears rendering errors and re-renders from the first path.
    /// Structural errors (a cyclic automaton) are detected again regardless.
    ClearOnReset,
}

/// Cursor state of a path iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// Positioned on a path.
    Active,
    /// No paths left.
    Exhausted,
    /// Enumeration failed; the cursor yields nothing further.
    Errored,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    state: StateId,
    next_transition: usize,
    final_pending: bool,
}

impl Frame {
    fn new(state: StateId) -> Self {
        Self {
            state,
            next_transition: 0,
            final_pending: true,
        }
    }
}

/// Enumerates every accepting path of an acyclic automaton.
///
/// Order is depth-first: a state's finality is reported before its outgoing
/// transitions are explored, and transitions are followed in insertion
/// order. Label sequences omit epsilons. A cyclic automaton puts the
/// iterator in [`PathStatus::Errored`] at construction.
pub struct PathIterator<'a, W: Semiring> {
    fst: &'a dyn Fst<W>,
    stack: Vec<Frame>,
    /// `(ilabel, olabel)` of each transition on the stack; one fewer than frames.
    path_labels: Vec<(Label, Label)>,
    /// `prefix_weights[i]` is the ⊗-product of the first `i` transitions.
    prefix_weights: Vec<W>,
    ilabels: Vec<Label>,
    olabels: Vec<Label>,
    weight: W,
    status: PathStatus,
    acyclic: bool,
}

impl<W: Semiring> fmt::Debug for PathIterator<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathIterator")
            .field("status", &self.status)
            .field("depth", &self.stack.len())
            .field("ilabels", &self.ilabels)
            .field("olabels", &self.olabels)
            .field("weight", &self.weight)
            .finish()
    }
}

impl<'a, W: Semiring> PathIterator<'a, W> {
    /// Creates an iterator positioned on the first path.
    pub fn new(fst: &'a dyn Fst<W>) -> Self {
        let acyclic = is_acyclic::<W>(fst);
        let mut it = Self {
            fst,
            stack: Vec::new(),
            path_labels: Vec::new(),
            prefix_weights: Vec::new(),
            ilabels: Vec::new(),
            olabels: Vec::new(),
            weight: W::zero(),
            status: PathStatus::Exhausted,
            acyclic,
        };
        if !acyclic {
            warn!("path iteration requested over a cyclic automaton");
        }
        it.reset();
        it
    }

    pub fn status(&self) -> PathStatus {
        self.status
    }

    /// True once no path is current: enumeration exhausted or errored.
    pub fn done(&self) -> bool {
        self.status != PathStatus::Active
    }

    pub fn error(&self) -> bool {
        self.status == PathStatus::Errored
    }

    /// The error behind [`PathStatus::Errored`], if any.
    pub fn last_error(&self) -> Option<FstError> {
        self.error().then_some(FstError::Cyclic)
    }

    /// Input labels of the current path, epsilons removed.
    pub fn ilabels(&self) -> &[Label] {
        &self.ilabels
    }

    /// Output labels of the current path, epsilons removed.
    pub fn olabels(&self) -> &[Label] {
        &self.olabels
    }

    /// Weight of the current path, including the final weight.
    pub fn weight(&self) -> &W {
        &self.weight
    }

    /// Advances to the next path; no-op once done.
    pub fn next(&mut self) {
        if self.done() {
            return;
        }
        self.advance();
    }

    /// Rewinds to the first path.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.path_labels.clear();
        self.prefix_weights.clear();
        self.clear_current();
        if !self.acyclic {
            self.status = PathStatus::Errored;
            return;
        }
        self.status = PathStatus::Active;
        if let Some(start) = self.fst.start() {
            self.stack.push(Frame::new(start));
            self.prefix_weights.push(W::one());
        }
        self.advance();
    }

    fn clear_current(&mut self) {
        self.ilabels.clear();
        self.olabels.clear();
        self.weight = W::zero();
    }

    fn advance(&mut self) {
        let fst = self.fst;
        loop {
            let Some(top) = self.stack.last_mut() else {
                self.status = PathStatus::Exhausted;
                self.clear_current();
                return;
            };

            if top.final_pending {
                top.final_pending = false;
                let final_weight = fst.final_weight(top.state);
                if !final_weight.is_zero() {
                    self.emit(&final_weight);
                    return;
                }
                continue;
            }

            if let Some(tr) = fst.transitions(top.state).get(top.next_transition) {
                top.next_transition += 1;
                let prefix = match self.prefix_weights.last() {
                    Some(w) => w.times(&tr.weight),
                    None => tr.weight.clone(),
                };
                self.prefix_weights.push(prefix);
                self.path_labels.push((tr.ilabel, tr.olabel));
                self.stack.push(Frame::new(tr.nextstate));
                continue;
            }

            self.stack.pop();
            self.prefix_weights.pop();
            self.path_labels.pop();
        }
    }

    fn emit(&mut self, final_weight: &W) {
        self.ilabels.clear();
        self.olabels.clear();
        for &(ilabel, olabel) in &self.path_labels {
            if ilabel != EPSILON {
                self.ilabels.push(ilabel);
            }
            if olabel != EPSILON {
                self.olabels.push(olabel);
            }
        }
        self.weight = match self.prefix_weights.last() {
            Some(w) => w.times(final_weight),
            None => final_weight.clone(),
        };
        trace!(ilabels = ?self.ilabels, weight = %self.weight, "path");
    }
}

/// Token types, symbol tables and error policy for a [`StringPathIterator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StringPathIteratorOptions<'s> {
    pub itype: StringTokenType,
    pub otype: StringTokenType,
    pub isyms: Option<&'s SymbolTable>,
    pub osyms: Option<&'s SymbolTable>,
    pub error_policy: ErrorPolicy,
}

impl<'s> StringPathIteratorOptions<'s> {
    pub fn new(itype: StringTokenType, otype: StringTokenType) -> Self {
        Self {
            itype,
            otype,
            ..Self::default()
        }
    }

    /// Same token type and symbol table on both tapes.
    pub fn uniform(token_type: StringTokenType, syms: Option<&'s SymbolTable>) -> Self {
        Self {
            itype: token_type,
            otype: token_type,
            isyms: syms,
            osyms: syms,
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_symbols(
        mut self,
        isyms: Option<&'s SymbolTable>,
        osyms: Option<&'s SymbolTable>,
    ) -> Self {
        self.isyms = isyms;
        self.osyms = osyms;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    fn check_symbols(&self) -> Option<FstError> {
        if self.itype.needs_symbols() && self.isyms.is_none() {
            return Some(FstError::MissingSymbolTable(self.itype));
        }
        if self.otype.needs_symbols() && self.osyms.is_none() {
            return Some(FstError::MissingSymbolTable(self.otype));
        }
        None
    }
}

/// A [`PathIterator`] that also renders both tapes of the current path as
/// strings.
///
/// Rendering happens whenever the cursor moves, so [`error`](Self::error)
/// already reflects an unrenderable label on the current path. A rendering
/// error does not end enumeration: [`done`](Self::done) only reports
/// exhaustion or a cyclic automaton, and [`next`](Self::next) keeps moving to
/// later paths. The first rendering error is kept until a reset under
/// [`ErrorPolicy::ClearOnReset`].
pub struct StringPathIterator<'a, W: Semiring> {
    iter: PathIterator<'a, W>,
    options: StringPathIteratorOptions<'a>,
    ibytes: Vec<u8>,
    obytes: Vec<u8>,
    istring: String,
    ostring: String,
    render_error: Option<FstError>,
}

impl<W: Semiring> fmt::Debug for StringPathIterator<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringPathIterator")
            .field("iter", &self.iter)
            .field("itype", &self.options.itype)
            .field("otype", &self.options.otype)
            .field("istring", &self.istring)
            .field("ostring", &self.ostring)
            .field("render_error", &self.render_error)
            .finish()
    }
}

impl<'a, W: Semiring> StringPathIterator<'a, W> {
    pub fn new(fst: &'a dyn Fst<W>, options: StringPathIteratorOptions<'a>) -> Self {
        let render_error = options.check_symbols();
        if let Some(e) = &render_error {
            warn!(error = %e, "string path iterator misconfigured");
        }
        let mut it = Self {
            iter: PathIterator::new(fst),
            options,
            ibytes: Vec::new(),
            obytes: Vec::new(),
            istring: String::new(),
            ostring: String::new(),
            render_error,
        };
        it.render();
        it
    }

    pub fn done(&self) -> bool {
        self.iter.done()
    }

    pub fn error(&self) -> bool {
        self.render_error.is_some() || self.iter.error()
    }

    /// [`PathStatus::Errored`] whenever [`error`](Self::error) is true, even
    /// while paths remain.
    pub fn status(&self) -> PathStatus {
        if self.render_error.is_some() {
            PathStatus::Errored
        } else {
            self.iter.status()
        }
    }

    pub fn last_error(&self) -> Option<FstError> {
        self.render_error.clone().or_else(|| self.iter.last_error())
    }

    pub fn ilabels(&self) -> &[Label] {
        self.iter.ilabels()
    }

    pub fn olabels(&self) -> &[Label] {
        self.iter.olabels()
    }

    pub fn istring(&self) -> &str {
        &self.istring
    }

    pub fn ostring(&self) -> &str {
        &self.ostring
    }

    /// Exact bytes of the input tape. Under [`StringTokenType::Byte`] these
    /// need not be UTF-8, while [`istring`](Self::istring) replaces invalid
    /// sequences with U+FFFD.
    pub fn istring_bytes(&self) -> &[u8] {
        &self.ibytes
    }

    pub fn ostring_bytes(&self) -> &[u8] {
        &self.obytes
    }

    pub fn weight(&self) -> &W {
        self.iter.weight()
    }

    pub fn next(&mut self) {
        if self.done() {
            return;
        }
        self.iter.next();
        self.render();
    }

    pub fn reset(&mut self) {
        if self.options.error_policy == ErrorPolicy::ClearOnReset {
            self.render_error = self.options.check_symbols();
        }
        self.iter.reset();
        self.render();
    }

    fn render(&mut self) {
        self.ibytes.clear();
        self.obytes.clear();
        self.istring.clear();
        self.ostring.clear();
        if self.iter.done() {
            return;
        }
        let opts = self.options;
        let rendered = labels_to_bytes(self.iter.ilabels(), opts.itype, opts.isyms).and_then(
            |ibytes| {
                labels_to_bytes(self.iter.olabels(), opts.otype, opts.osyms)
                    .map(|obytes| (ibytes, obytes))
            },
        );
        match rendered {
            Ok((ibytes, obytes)) => {
                self.istring = String::from_utf8_lossy(&ibytes).into_owned();
                self.ostring = String::from_utf8_lossy(&obytes).into_owned();
                self.ibytes = ibytes;
                self.obytes = obytes;
            }
            Err(e) if self.render_error.is_some() => {
                trace!(error = %e, "path cannot be rendered");
            }
            Err(e) => {
                warn!(error = %e, "path cannot be rendered");
                self.render_error = Some(e);
            }
        }
    }
}
