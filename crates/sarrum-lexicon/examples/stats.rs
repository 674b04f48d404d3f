use std::env;
use std::fs;

use anyhow::{Context, Result};
use sarrum_lexicon::Dictionary;
use sarrum_types::Direction;

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: cargo run -p sarrum-lexicon --example stats -- <path-to-lexicon>")?;

    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let dict = Dictionary::parse(&text).with_context(|| format!("parsing {path}"))?;

    println!("Lexicon: {path}");
    println!("Records       : {}", dict.total_records());
    println!(
        "Akkadian keys : {}",
        dict.keys(Direction::AkkadianToEnglish).len()
    );
    println!(
        "English keys  : {}",
        dict.keys(Direction::EnglishToAkkadian).len()
    );

    for section in dict.sections() {
        println!("§{} {} ({} records)", section.num, section.name, section.size);
    }

    let mut senses = 0usize;
    let mut relations = 0usize;
    for key in dict.keys(Direction::AkkadianToEnglish) {
        let entries = dict.get_defn(key, Direction::AkkadianToEnglish);
        senses += entries.len();
        relations += entries.iter().map(|e| e.relations().len()).sum::<usize>();
    }
    println!("Akkadian senses: {senses}");
    println!("Relations      : {relations}");

    // Spot-check a lookup in each direction.
    if let Some((word, entry)) = dict.random_entry(Direction::AkkadianToEnglish) {
        println!("Sample entry: {word} ({}) {:?}", entry.grammar_kind(), entry.defns());
    }

    Ok(())
}
