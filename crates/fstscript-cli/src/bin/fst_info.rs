// fst-info: Print basic properties of a binary automaton.
//
// Usage:
//   fst-info [IN]
//
// Options:
//   -h, --help             Print help

use std::io::{self, Write};

use fstscript_cli::fatal;

fn main() {
    fstscript_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if fstscript_cli::wants_help(&args) {
        println!("fst-info: Print basic properties of a binary automaton.");
        println!();
        println!("Usage: fst-info [IN]");
        println!();
        println!("Reads from stdin when IN is omitted or '-'.");
        return;
    }
    if args.len() > 1 {
        fatal("expected at most one input file (see --help)");
    }

    let fst = fstscript_cli::read_fst(args.first().map(String::as_str))
        .unwrap_or_else(|e| fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let start = fst
        .start()
        .map_or_else(|| "none".to_string(), |s| s.to_string());
    let _ = writeln!(out, "{:<20}{}", "arc type", fst.arc_type());
    let _ = writeln!(out, "{:<20}{}", "weight type", fst.weight_type());
    let _ = writeln!(out, "{:<20}{}", "start state", start);
    let _ = writeln!(out, "{:<20}{}", "# of states", fst.num_states());
    let _ = writeln!(out, "{:<20}{}", "# of arcs", fst.num_transitions());
    let _ = writeln!(out, "{:<20}{}", "acyclic", if fst.is_acyclic() { "y" } else { "n" });
}
