// fst-paths: Print every accepting path of an acyclic automaton.
//
// Plain output is one path per line: input string, output string and path
// weight separated by tabs. The strings are written as raw bytes, so byte
// tapes that are not UTF-8 come out unchanged. With --json the paths are printed as one JSON
// array of objects.
//
// Usage:
//   fst-paths [OPTIONS] [IN]
//
// Options:
//   --token-type TYPE      Token type for both tapes (default: byte)
//   --itype TYPE           Input token type (overrides --token-type)
//   --otype TYPE           Output token type (overrides --token-type)
//   --symbols FILE         Symbol table for both tapes
//   --isymbols FILE        Input symbol table (overrides --symbols)
//   --osymbols FILE        Output symbol table (overrides --symbols)
//   --json                 Print JSON instead of tab-separated lines
//   -h, --help             Print help

use std::io::{self, Write};

use serde::Serialize;

use fstscript::{StringPathIteratorClass, StringPathIteratorOptions};
use fstscript_cli::{fatal, parse_token_type, read_optional_symbols, take_flag, take_option};

#[derive(Serialize)]
struct PathRecord {
    input: String,
    output: String,
    ilabels: Vec<i64>,
    olabels: Vec<i64>,
    weight: String,
}

fn write_plain(out: &mut impl Write, it: &StringPathIteratorClass<'_>) -> io::Result<()> {
    out.write_all(&it.istring_bytes())?;
    out.write_all(b"\t")?;
    out.write_all(&it.ostring_bytes())?;
    writeln!(out, "\t{}", it.weight())
}

fn main() {
    fstscript_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if fstscript_cli::wants_help(&args) {
        println!("fst-paths: Print every accepting path of an acyclic automaton.");
        println!();
        println!("Usage: fst-paths [OPTIONS] [IN]");
        println!();
        println!("Options:");
        println!("  --token-type TYPE      Token type for both tapes (default: byte)");
        println!("  --itype TYPE           Input token type (overrides --token-type)");
        println!("  --otype TYPE           Output token type (overrides --token-type)");
        println!("  --symbols FILE         Symbol table for both tapes");
        println!("  --isymbols FILE        Input symbol table (overrides --symbols)");
        println!("  --osymbols FILE        Output symbol table (overrides --symbols)");
        println!("  --json                 Print JSON instead of tab-separated lines");
        println!("  -h, --help             Print this help");
        return;
    }

    let (json, args) = take_flag(&args, "json");
    let parsed = (|| {
        let (token_type, args) = take_option(&args, "token-type", None)?;
        let (itype, args) = take_option(&args, "itype", None)?;
        let (otype, args) = take_option(&args, "otype", None)?;
        let (symbols, args) = take_option(&args, "symbols", None)?;
        let (isymbols, args) = take_option(&args, "isymbols", None)?;
        let (osymbols, args) = take_option(&args, "osymbols", None)?;
        Ok::<_, String>((token_type, itype, otype, symbols, isymbols, osymbols, args))
    })();
    let (token_type, itype, otype, symbols, isymbols, osymbols, args) =
        parsed.unwrap_or_else(|e| fatal(&e));
    if args.len() > 1 {
        fatal("expected at most one input file (see --help)");
    }

    let itype = parse_token_type(itype.or_else(|| token_type.clone()).as_deref())
        .unwrap_or_else(|e| fatal(&e));
    let otype =
        parse_token_type(otype.or(token_type).as_deref()).unwrap_or_else(|e| fatal(&e));
    let isyms = read_optional_symbols(isymbols.or_else(|| symbols.clone()).as_deref())
        .unwrap_or_else(|e| fatal(&e));
    let osyms = read_optional_symbols(osymbols.or(symbols).as_deref())
        .unwrap_or_else(|e| fatal(&e));

    let fst = fstscript_cli::read_fst(args.first().map(String::as_str))
        .unwrap_or_else(|e| fatal(&e));
    let options =
        StringPathIteratorOptions::new(itype, otype).with_symbols(isyms.as_ref(), osyms.as_ref());
    let mut it = StringPathIteratorClass::with_options(&fst, options)
        .unwrap_or_else(|e| fatal(&e.to_string()));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut records = Vec::new();

    while !it.done() {
        if json {
            records.push(PathRecord {
                input: it.istring(),
                output: it.ostring(),
                ilabels: it.ilabels(),
                olabels: it.olabels(),
                weight: it.weight().to_string(),
            });
        } else if let Err(e) = write_plain(&mut out, &it) {
            fatal(&format!("failed to write paths: {e}"));
        }
        it.next();
    }

    if json {
        match serde_json::to_string_pretty(&records) {
            Ok(text) => {
                let _ = writeln!(out, "{text}");
            }
            Err(e) => fatal(&format!("failed to serialize paths: {e}")),
        }
    }
    let _ = out.flush();

    if let Some(e) = it.last_error() {
        fatal(&format!("path enumeration failed: {e}"));
    }
}
