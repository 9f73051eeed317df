use std::env;
use std::fs;
use std::path::PathBuf;

// Regenerates the per-radix maximum-power tables embedded in the engine:
// for each radix 2..=36 and each word width, the largest exponent e with
// radix^e still representable in that word. Writes Rust source to stdout or
// to --output.

struct Row {
    radix: u32,
    exponent: u32,
    value: u128,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let output = get_flag_value(&args, "--output").map(PathBuf::from);

    let mut text = String::new();
    text.push_str(
        "// Largest power of each radix representable in a machine word, for the\n\
         // 16/32/64/128-bit word widths. (exponent, radix^exponent), radix 2 first.\n\
         // Generated by radix_table_gen; do not edit by hand.\n",
    );
    for bits in [16u32, 32, 64, 128] {
        text.push('\n');
        text.push_str(&render_table(bits, &max_powers(bits)));
    }

    match output {
        Some(path) => fs::write(&path, text).unwrap_or_else(|err| {
            eprintln!("failed to write {}: {err}", path.display());
            std::process::exit(2);
        }),
        None => print!("{text}"),
    }
}

fn get_flag_value(args: &[String], flag: &str) -> Option<String> {
    let index = args.iter().position(|a| a == flag)?;
    args.get(index + 1).cloned()
}

fn max_powers(bits: u32) -> Vec<Row> {
    let limit: Option<u128> = if bits == 128 {
        None
    } else {
        Some(1u128 << bits)
    };
    (2u32..=36)
        .map(|radix| {
            let mut exponent = 1u32;
            let mut value = radix as u128;
            loop {
                let next = match value.checked_mul(radix as u128) {
                    Some(next) => next,
                    None => break,
                };
                if let Some(limit) = limit {
                    if next >= limit {
                        break;
                    }
                }
                value = next;
                exponent += 1;
            }
            Row {
                radix,
                exponent,
                value,
            }
        })
        .collect()
}

fn render_table(bits: u32, rows: &[Row]) -> String {
    let element = match bits {
        16 => "u16",
        32 => "u32",
        64 => "u64",
        _ => "u128",
    };
    let mut out = String::new();
    out.push_str("#[rustfmt::skip]\n");
    out.push_str(&format!(
        "pub const MAXPOW{bits}: [(u32, {element}); {}] = [\n",
        rows.len()
    ));
    for row in rows {
        out.push_str(&format!("    ({}, {}),\n", row.exponent, row.value));
    }
    out.push_str("];\n");
    out
}
