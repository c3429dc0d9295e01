// Binary FST format: header parsing, validation, reading and writing.
//
// Layout (little-endian):
// - bytes 0..4: cookie1, bytes 4..8: cookie2 (magic numbers)
// - bytes 8..10: format version
// - bytes 10..12: arc type name length `n`
// - bytes 12..16: reserved (zero)
// - bytes 16..16+n: arc type name (UTF-8), zero-padded to an 8-byte boundary
// - one `CountsRecord`
// - `num_states` `StateRecord`s, then `num_transitions` `TransitionRecord`s
//   grouped by source state in state order

use bytemuck::{Pod, Zeroable};

use crate::transition::{StateRecord, TransitionRecord};
use crate::vector::{Fst, MutableFst, VectorFst};
use crate::weight::Semiring;
use crate::{FstError, StateId};

const COOKIE1: u32 = 0x7473_6673;
const COOKIE2: u32 = 0x0001_F57A;

/// Current (and only) format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed part of the header in bytes.
pub const HEADER_SIZE: usize = 16;

const NO_START: u32 = u32::MAX;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CountsRecord {
    start: u32,
    num_states: u32,
    num_transitions: u64,
}

/// Parsed FST file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstHeader {
    pub version: u16,
    /// Arc type the file was written with, e.g. `"standard"`.
    pub arc_type: String,
    pub start: Option<StateId>,
    pub num_states: u32,
    pub num_transitions: u64,
    /// Offset of the first `StateRecord`.
    body_offset: usize,
}

fn align8(n: usize) -> usize {
    n.div_ceil(8) * 8
}

/// Parses and validates the header, including the arc type name and counts.
pub fn parse_header(data: &[u8]) -> Result<FstHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let cookie1 = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let cookie2 = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if cookie1 != COOKIE1 || cookie2 != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }

    let version = u16::from_le_bytes([data[8], data[9]]);
    if version != FORMAT_VERSION {
        return Err(FstError::UnsupportedVersion(version));
    }

    let name_len = u16::from_le_bytes([data[10], data[11]]) as usize;
    let name_end = HEADER_SIZE + name_len;
    let counts_offset = align8(name_end);
    let body_offset = counts_offset + size_of::<CountsRecord>();
    if data.len() < body_offset {
        return Err(FstError::TooShort {
            expected: body_offset,
            actual: data.len(),
        });
    }

    let arc_type = std::str::from_utf8(&data[HEADER_SIZE..name_end])
        .map_err(|_| FstError::Corrupt("arc type name is not valid UTF-8".to_string()))?
        .to_string();

    let counts: CountsRecord =
        bytemuck::pod_read_unaligned(&data[counts_offset..body_offset]);
    let start = (counts.start != NO_START).then_some(counts.start);
    if let Some(s) = start {
        if s >= counts.num_states {
            return Err(FstError::Corrupt(format!(
                "start state {s} out of range ({} states)",
                counts.num_states
            )));
        }
    }

    Ok(FstHeader {
        version,
        arc_type,
        start,
        num_states: counts.num_states,
        num_transitions: counts.num_transitions,
        body_offset,
    })
}

/// Serializes any automaton into the binary format.
pub fn write_fst<W: Semiring>(fst: &(impl Fst<W> + ?Sized)) -> Vec<u8> {
    let arc_type = W::arc_type().as_bytes();
    let num_states = fst.num_states();
    let num_transitions = fst.total_transitions();

    let mut buf = Vec::with_capacity(
        align8(HEADER_SIZE + arc_type.len())
            + size_of::<CountsRecord>()
            + num_states * size_of::<StateRecord>()
            + num_transitions * size_of::<TransitionRecord>(),
    );
    buf.extend_from_slice(&COOKIE1.to_le_bytes());
    buf.extend_from_slice(&COOKIE2.to_le_bytes());
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(arc_type.len() as u16).to_le_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    buf.extend_from_slice(arc_type);
    buf.resize(align8(buf.len()), 0);

    let counts = CountsRecord {
        start: fst.start().unwrap_or(NO_START),
        num_states: num_states as u32,
        num_transitions: num_transitions as u64,
    };
    buf.extend_from_slice(bytemuck::bytes_of(&counts));

    for s in 0..num_states as StateId {
        let rec = StateRecord {
            final_bits: fst.final_weight(s).to_bits(),
            num_transitions: fst.num_transitions(s) as u32,
            _reserved: 0,
        };
        buf.extend_from_slice(bytemuck::bytes_of(&rec));
    }
    for s in 0..num_states as StateId {
        for tr in fst.transitions(s) {
            buf.extend_from_slice(bytemuck::bytes_of(&TransitionRecord::from_transition(tr)));
        }
    }
    buf
}

/// Copies `count` records starting at `offset` into an aligned `Vec`.
///
/// Returns the records and the offset just past them.
fn read_records<T: Pod>(data: &[u8], offset: usize, count: usize) -> Result<(Vec<T>, usize), FstError> {
    let end = count
        .checked_mul(size_of::<T>())
        .and_then(|len| offset.checked_add(len))
        .ok_or_else(|| FstError::Corrupt("record count overflows".to_string()))?;
    if end > data.len() {
        return Err(FstError::TooShort {
            expected: end,
            actual: data.len(),
        });
    }
    let mut records = vec![T::zeroed(); count];
    bytemuck::cast_slice_mut::<T, u8>(&mut records).copy_from_slice(&data[offset..end]);
    Ok((records, end))
}

/// Deserializes an automaton written with arc type `W::arc_type()`.
pub fn read_fst<W: Semiring>(data: &[u8]) -> Result<VectorFst<W>, FstError> {
    let header = parse_header(data)?;
    if header.arc_type != W::arc_type() {
        return Err(FstError::ArcTypeMismatch {
            expected: W::arc_type().to_string(),
            actual: header.arc_type,
        });
    }

    let num_states = header.num_states as usize;
    let num_transitions = usize::try_from(header.num_transitions)
        .map_err(|_| FstError::Corrupt("transition count too large".to_string()))?;
    let (states, tr_offset) = read_records::<StateRecord>(data, header.body_offset, num_states)?;
    let (transitions, _) = read_records::<TransitionRecord>(data, tr_offset, num_transitions)?;

    let declared: u64 = states.iter().map(|s| u64::from(s.num_transitions)).sum();
    if declared != header.num_transitions {
        return Err(FstError::Corrupt(format!(
            "states declare {declared} transitions, header says {}",
            header.num_transitions
        )));
    }

    let mut fst = VectorFst::new();
    for _ in 0..num_states {
        fst.add_state();
    }
    let mut next = 0usize;
    for (s, rec) in states.iter().enumerate() {
        let s = s as StateId;
        fst.set_final(s, W::from_bits(rec.final_bits))?;
        for raw in &transitions[next..next + rec.num_transitions as usize] {
            if raw.nextstate >= header.num_states {
                return Err(FstError::Corrupt(format!(
                    "transition from state {s} targets missing state {}",
                    raw.nextstate
                )));
            }
            fst.add_transition(s, raw.to_transition())?;
        }
        next += rec.num_transitions as usize;
    }
    if let Some(start) = header.start {
        fst.set_start(start)?;
    }
    Ok(fst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile_string;
    use crate::union::union;
    use crate::weight::{Log64Weight, LogWeight, TropicalWeight};
    use crate::StringTokenType;

    fn sample() -> VectorFst<TropicalWeight> {
        let mut fst =
            compile_string("ab", StringTokenType::Byte, None, TropicalWeight(1.5)).unwrap();
        union(
            &mut fst,
            &compile_string("c", StringTokenType::Byte, None, TropicalWeight(0.25)).unwrap(),
        )
        .unwrap();
        fst
    }

    #[test]
    fn write_then_read_preserves_automaton() {
        let fst = sample();
        let data = write_fst(&fst);
        let back: VectorFst<TropicalWeight> = read_fst(&data).unwrap();
        assert_eq!(back, fst);
    }

    #[test]
    fn header_records_arc_type() {
        let data = write_fst(&sample());
        let header = parse_header(&data).unwrap();
        assert_eq!(header.arc_type, "standard");
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.num_states, sample().num_states() as u32);
        assert_eq!(header.start, sample().start());

        let log: VectorFst<Log64Weight> =
            compile_string("x", StringTokenType::Byte, None, Log64Weight(0.0)).unwrap();
        assert_eq!(parse_header(&write_fst(&log)).unwrap().arc_type, "log64");
    }

    #[test]
    fn empty_automaton_has_no_start() {
        let fst: VectorFst<LogWeight> = VectorFst::new();
        let data = write_fst(&fst);
        let header = parse_header(&data).unwrap();
        assert_eq!(header.start, None);
        let back: VectorFst<LogWeight> = read_fst(&data).unwrap();
        assert_eq!(back.num_states(), 0);
    }

    #[test]
    fn reject_wrong_arc_type() {
        let data = write_fst(&sample());
        let err = read_fst::<LogWeight>(&data).unwrap_err();
        assert_eq!(
            err,
            FstError::ArcTypeMismatch {
                expected: "log".to_string(),
                actual: "standard".to_string()
            }
        );
    }

    #[test]
    fn reject_too_short() {
        let err = parse_header(&[0u8; 8]).unwrap_err();
        assert!(matches!(
            err,
            FstError::TooShort {
                expected: 16,
                actual: 8
            }
        ));
    }

    #[test]
    fn reject_invalid_magic() {
        let mut data = write_fst(&sample());
        data[0] ^= 0xFF;
        assert_eq!(parse_header(&data).unwrap_err(), FstError::InvalidMagic);
    }

    #[test]
    fn reject_unknown_version() {
        let mut data = write_fst(&sample());
        data[8] = 9;
        assert_eq!(parse_header(&data).unwrap_err(), FstError::UnsupportedVersion(9));
    }

    #[test]
    fn reject_truncated_body() {
        let data = write_fst(&sample());
        let err = read_fst::<TropicalWeight>(&data[..data.len() - 4]).unwrap_err();
        assert!(matches!(err, FstError::TooShort { .. }));
    }

    #[test]
    fn reject_dangling_transition_target() {
        let fst = sample();
        let mut data = write_fst(&fst);
        // nextstate of the last transition record
        let rec = data.len() - size_of::<TransitionRecord>();
        data[rec + 8..rec + 12].copy_from_slice(&999u32.to_le_bytes());
        assert!(matches!(
            read_fst::<TropicalWeight>(&data),
            Err(FstError::Corrupt(_))
        ));
    }
}
