//! Reduce a feed of primitive events and print the resulting history.
//!
//! Usage: `cargo run --example replay -- [FEED]`. Reads stdin without FEED.
//! Add `--json` to print JSON lines instead of sentences.

use fsfold::{feed, Reducer};
use std::io::{self, Read};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let source = args.iter().find(|a| !a.starts_with("--"));

    let events = match source {
        Some(path) => feed::read_file(Path::new(path))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            feed::parse_batch(&text)?
        }
    };

    let mut reducer = Reducer::new();
    reducer.ingest_all(events)?;
    let history = reducer.finish()?;

    if json {
        history.write_jsonl(io::stdout().lock())?;
    } else {
        for line in history.narrate() {
            println!("{line}");
        }
    }
    Ok(())
}
