use std::env;

use anyhow::{Result, bail};
use bible_text::{canonical_abbrev, decode_hebrew_numeral, full_name, is_canonical, normalize};

fn main() -> Result<()> {
    let inputs: Vec<String> = env::args().skip(1).collect();
    if inputs.is_empty() {
        bail!("usage: cargo run -p bible-text --example lookup -- <text>...");
    }

    for raw in inputs {
        println!("\nInput: {raw}");
        println!("  normalized : {}", normalize(&raw));

        let abbrev = canonical_abbrev(&raw);
        if is_canonical(&abbrev) {
            println!("  book       : {abbrev} ({})", full_name(&abbrev));
        } else {
            println!("  book       : {abbrev} [not in catalog]");
        }

        let numeral = decode_hebrew_numeral(&raw);
        if numeral > 0 {
            println!("  numeral    : {numeral}");
        }
    }

    Ok(())
}
