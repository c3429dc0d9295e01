// Compiling strings into linear automata.

use crate::string::string_to_labels;
use crate::symbols::SymbolTable;
use crate::transition::Transition;
use crate::vector::{MutableFst, VectorFst};
use crate::weight::Semiring;
use crate::{EPSILON, FstError, Label, StringTokenType};

/// Compiles `text` into a linear acceptor whose single path carries `weight`
/// as the final weight.
pub fn compile_string<W: Semiring>(
    text: &str,
    token_type: StringTokenType,
    syms: Option<&SymbolTable>,
    weight: W,
) -> Result<VectorFst<W>, FstError> {
    let labels = string_to_labels(text, token_type, syms)?;
    linear(&labels, &labels, weight)
}

/// Compiles a linear transducer mapping `input` to `output`.
///
/// The shorter side is padded with epsilons at the end.
pub fn compile_string_pair<W: Semiring>(
    input: &str,
    output: &str,
    itype: StringTokenType,
    otype: StringTokenType,
    isyms: Option<&SymbolTable>,
    osyms: Option<&SymbolTable>,
    weight: W,
) -> Result<VectorFst<W>, FstError> {
    let ilabels = string_to_labels(input, itype, isyms)?;
    let olabels = string_to_labels(output, otype, osyms)?;
    linear(&ilabels, &olabels, weight)
}

fn linear<W: Semiring>(
    ilabels: &[Label],
    olabels: &[Label],
    weight: W,
) -> Result<VectorFst<W>, FstError> {
    let len = ilabels.len().max(olabels.len());
    let mut fst = VectorFst::new();
    let mut state = fst.add_state();
    fst.set_start(state)?;
    for i in 0..len {
        let next = fst.add_state();
        let ilabel = ilabels.get(i).copied().unwrap_or(EPSILON);
        let olabel = olabels.get(i).copied().unwrap_or(EPSILON);
        fst.add_transition(state, Transition::new(ilabel, olabel, W::one(), next))?;
        state = next;
    }
    fst.set_final(state, weight)?;
    Ok(fst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Fst;
    use crate::weight::{LogWeight, TropicalWeight};

    #[test]
    fn compile_byte_acceptor() {
        let fst = compile_string("ab", StringTokenType::Byte, None, TropicalWeight(1.5)).unwrap();
        assert_eq!(fst.num_states(), 3);
        assert_eq!(fst.start(), Some(0));
        let tr = &fst.transitions(0)[0];
        assert_eq!((tr.ilabel, tr.olabel, tr.nextstate), (97, 97, 1));
        assert_eq!(fst.final_weight(2), TropicalWeight(1.5));
    }

    #[test]
    fn compile_empty_string_accepts_epsilon() {
        let fst = compile_string("", StringTokenType::Utf8, None, LogWeight::one()).unwrap();
        assert_eq!(fst.num_states(), 1);
        assert!(fst.is_final(0));
    }

    #[test]
    fn compile_symbol_string() {
        let syms = SymbolTable::from_symbols("w", ["big", "dog"]);
        let fst =
            compile_string("big dog", StringTokenType::Symbol, Some(&syms), TropicalWeight::one())
                .unwrap();
        assert_eq!(fst.transitions(1)[0].ilabel, 2);
    }

    #[test]
    fn compile_symbol_string_with_unknown_word() {
        let syms = SymbolTable::from_symbols("w", ["big"]);
        let err =
            compile_string("big cat", StringTokenType::Symbol, Some(&syms), TropicalWeight::one())
                .unwrap_err();
        assert_eq!(err, FstError::UnknownSymbol("cat".to_string()));
    }

    #[test]
    fn compile_pair_pads_shorter_side() {
        let fst = compile_string_pair(
            "abc",
            "x",
            StringTokenType::Byte,
            StringTokenType::Byte,
            None,
            None,
            TropicalWeight::one(),
        )
        .unwrap();
        assert_eq!(fst.num_states(), 4);
        assert_eq!(fst.transitions(0)[0].olabel, 120);
        assert_eq!(fst.transitions(1)[0].olabel, EPSILON);
        assert_eq!(fst.transitions(2)[0].ilabel, 99);
    }
}
