// fst-compile-string: Compile a string into a linear acceptor.
//
// Writes the binary automaton to OUT (or stdout). The arc type comes from
// --arc-type, then FSTSCRIPT_ARC_TYPE, then "standard".
//
// Usage:
//   fst-compile-string [OPTIONS] TEXT
//
// Options:
//   --arc-type TYPE        standard, log or log64
//   --token-type TYPE      byte (default), utf8 or symbol
//   --symbols FILE         Symbol table (required for symbol)
//   --weight W             Path weight (default: semiring one)
//   -o, --output FILE      Output file (default: stdout)
//   -h, --help             Print help

use fstscript::{FstClass, WeightClass};
use fstscript_cli::{fatal, read_optional_symbols, take_option};

fn main() {
    fstscript_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if fstscript_cli::wants_help(&args) {
        println!("fst-compile-string: Compile a string into a linear acceptor.");
        println!();
        println!("Usage: fst-compile-string [OPTIONS] TEXT");
        println!();
        println!("Options:");
        println!("  --arc-type TYPE        standard, log or log64 (env: FSTSCRIPT_ARC_TYPE)");
        println!("  --token-type TYPE      byte (default), utf8 or symbol");
        println!("  --symbols FILE         Symbol table (required for symbol)");
        println!("  --weight W             Path weight (default: semiring one)");
        println!("  -o, --output FILE      Output file (default: stdout)");
        println!("  -h, --help             Print this help");
        return;
    }

    let parsed = (|| {
        let (arc_type, args) = take_option(&args, "arc-type", None)?;
        let (token_type, args) = take_option(&args, "token-type", None)?;
        let (symbols, args) = take_option(&args, "symbols", None)?;
        let (weight, args) = take_option(&args, "weight", None)?;
        let (output, args) = take_option(&args, "output", Some("-o"))?;
        Ok::<_, String>((arc_type, token_type, symbols, weight, output, args))
    })();
    let (arc_type, token_type, symbols, weight, output, args) =
        parsed.unwrap_or_else(|e| fatal(&e));

    let [text] = args.as_slice() else {
        fatal("expected exactly one TEXT argument (see --help)");
    };

    let arc_type = fstscript_cli::resolve_arc_type(arc_type.as_deref());
    let token_type =
        fstscript_cli::parse_token_type(token_type.as_deref()).unwrap_or_else(|e| fatal(&e));
    let syms = read_optional_symbols(symbols.as_deref()).unwrap_or_else(|e| fatal(&e));

    let weight = weight.map(|w| {
        let weight_type = FstClass::new(&arc_type)
            .unwrap_or_else(|e| fatal(&e.to_string()))
            .weight_type();
        WeightClass::parse(weight_type, &w).unwrap_or_else(|e| fatal(&e.to_string()))
    });

    let fst = FstClass::from_string(text, &arc_type, token_type, syms.as_ref(), weight.as_ref())
        .unwrap_or_else(|e| fatal(&e.to_string()));
    fstscript_cli::write_fst(output.as_deref(), &fst).unwrap_or_else(|e| fatal(&e));
}
