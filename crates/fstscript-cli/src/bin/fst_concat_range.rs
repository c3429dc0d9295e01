// fst-concat-range: Repeat an automaton between LOWER and UPPER times.
//
// Reads a binary automaton from IN (or stdin) and writes the result to OUT
// (or stdout). UPPER 0 means no upper bound.
//
// Usage:
//   fst-concat-range [--lower N] [--upper N] [-o OUT] [IN]
//
// Options:
//   --lower N              Minimum number of copies (default: 0)
//   --upper N              Maximum number of copies, 0 = unbounded (default: 0)
//   -o, --output FILE      Output file (default: stdout)
//   -h, --help             Print help

use fstscript::ConcatRangeArgs;
use fstscript_cli::{fatal, take_option};

fn parse_bound(name: &str, value: Option<String>) -> u32 {
    match value {
        Some(v) => v
            .parse()
            .unwrap_or_else(|_| fatal(&format!("--{name} expects a non-negative integer, got {v:?}"))),
        None => 0,
    }
}

fn main() {
    fstscript_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if fstscript_cli::wants_help(&args) {
        println!("fst-concat-range: Repeat an automaton between LOWER and UPPER times.");
        println!();
        println!("Usage: fst-concat-range [--lower N] [--upper N] [-o OUT] [IN]");
        println!();
        println!("Options:");
        println!("  --lower N              Minimum number of copies (default: 0)");
        println!("  --upper N              Maximum number of copies, 0 = unbounded (default: 0)");
        println!("  -o, --output FILE      Output file (default: stdout)");
        println!("  -h, --help             Print this help");
        return;
    }

    let (lower, args) = take_option(&args, "lower", None).unwrap_or_else(|e| fatal(&e));
    let (upper, args) = take_option(&args, "upper", None).unwrap_or_else(|e| fatal(&e));
    let (output, args) = take_option(&args, "output", Some("-o")).unwrap_or_else(|e| fatal(&e));
    if args.len() > 1 {
        fatal("expected at most one input file (see --help)");
    }

    let range = ConcatRangeArgs::new(parse_bound("lower", lower), parse_bound("upper", upper));
    let mut fst = fstscript_cli::read_fst(args.first().map(String::as_str))
        .unwrap_or_else(|e| fatal(&e));
    fstscript::concat_range_with(&mut fst, range).unwrap_or_else(|e| fatal(&e.to_string()));
    fstscript_cli::write_fst(output.as_deref(), &fst).unwrap_or_else(|e| fatal(&e));
}
