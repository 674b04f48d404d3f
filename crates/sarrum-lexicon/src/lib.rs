//! Build bidirectional Akkadian↔English lookup tables from the flat lexicon
//! text.
//!
//! The lexicon is one UTF-8 string of line-oriented records
//! (`word,defn1;defn2,kind[,attrs]`) with optional `§`-numbered section
//! headers. [`Dictionary::parse`] ingests the whole text at once and either
//! returns a fully-populated dictionary or a definite [`ParseError`]; no
//! partially-built state is ever exposed. Parsing runs in two phases: rows
//! become entries in both direction tables, then every user-declared word
//! relation is resolved into an inverse relation on its target entry.
//!
//! # Features
//! - Insert-or-merge: multiple rows for the same word collapse into one
//!   sense when their grammatical shape agrees, and stay separate senses
//!   otherwise.
//! - Section bookkeeping: `§<num> <name>` headers partition the lexicon,
//!   and [`Dictionary::with_sections`] derives a filtered view.
//! - Forward compatibility: lines starting outside the Akkadian alphabet
//!   (and `§`) are skipped, not rejected, so newer lexicon formats stay
//!   readable by older engines.
//!
//! # Example
//! ```rust
//! use sarrum_lexicon::Dictionary;
//! use sarrum_types::Direction;
//!
//! # fn main() -> Result<(), sarrum_lexicon::ParseError> {
//! let dict = Dictionary::parse("awīlum,man;gentleman,n,nom;s;m\n")?;
//! let entries = dict.get_defn("awīlum", Direction::AkkadianToEnglish);
//! assert_eq!(entries[0].defns(), ["man", "gentleman"]);
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{info, warn};

use sarrum_types::{Direction, GrammarKind, WordAttr, WordRelation, WordRelationKind};

/// Glyph introducing a section header line.
pub const SECTION_MARKER: char = '§';

/// Display name of the synthetic section created for a header-less lexicon.
pub const DEFAULT_SECTION_NAME: &str = "Full Lexicon";

/// Letters of the Akkadian transliteration alphabet. A record line must
/// start with one of these; anything else is reserved for future format
/// extensions and skipped.
const AKKADIAN_ALPHABET: &[char] = &[
    'a', 'ā', 'â', 'b', 'd', 'e', 'ē', 'ê', 'g', 'h', 'ẖ', 'i', 'ī', 'î', 'k', 'l', 'm', 'n',
    'p', 'q', 'r', 's', 'ṣ', 'š', 't', 'ṭ', 'u', 'ū', 'û', 'w', 'y', 'z',
];

/// Structural failure that aborts the whole parse.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("line {line}: expected 3 or 4 comma-separated fields, found {count}")]
    FieldCount { line: usize, count: usize },
    #[error("line {line}: unknown grammar kind code `{code}`")]
    UnknownGrammarKind { line: usize, code: String },
    #[error("line {line}: `{token}` is not a word attribute code")]
    UnknownAttr { line: usize, token: String },
    #[error("line {line}: unknown relation `{name}`")]
    UnknownRelation { line: usize, name: String },
    #[error("line {line}: malformed relation token `{token}`")]
    MalformedRelation { line: usize, token: String },
    #[error("line {line}: malformed section header `{header}`")]
    MalformedSectionHeader { line: usize, header: String },
}

/// Where the raw lexicon text came from. Diagnostics only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LexiconOrigin {
    /// Freshly fetched from the distribution source.
    Remote,
    /// Served from a local cache or file.
    Cached,
}

impl fmt::Display for LexiconOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexiconOrigin::Remote => "remote",
            LexiconOrigin::Cached => "cached",
        })
    }
}

/// Raw lexicon text plus its provenance, as handed over by whichever
/// fetch/cache collaborator obtained it.
#[derive(Clone, Debug)]
pub struct LexiconSource {
    pub text: String,
    pub version: Option<u64>,
    pub origin: LexiconOrigin,
}

/// Named, numbered partition of the lexicon (one pedagogical lesson).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    pub num: u32,
    pub name: String,
    /// Number of lexicon records assigned while parsing.
    pub size: usize,
}

/// One word sense: attributes, definitions, part of speech, owning section,
/// and relations to other words.
///
/// `word_attrs` and `relations` are kept sorted at all times, so
/// compatibility and merge checks never need to re-sort. Relations grow
/// through [`DictEntry::add_relation`] while the parser resolves inverse
/// relations; consumers only ever read them.
#[derive(Clone, Debug, PartialEq)]
pub struct DictEntry {
    word_attrs: Vec<WordAttr>,
    defns: Vec<String>,
    grammar_kind: GrammarKind,
    section_num: u32,
    relations: Vec<WordRelation>,
}

impl DictEntry {
    pub fn new(
        mut word_attrs: Vec<WordAttr>,
        defns: Vec<String>,
        grammar_kind: GrammarKind,
        section_num: u32,
        mut relations: Vec<WordRelation>,
    ) -> Self {
        word_attrs.sort();
        word_attrs.dedup();
        relations.sort();

        Self {
            word_attrs,
            defns,
            grammar_kind,
            section_num,
            relations,
        }
    }

    /// Morphological tags, sorted by their canonical ordering.
    pub fn word_attrs(&self) -> &[WordAttr] {
        &self.word_attrs
    }

    /// Definitions in source order. Order matters for display only.
    pub fn defns(&self) -> &[String] {
        &self.defns
    }

    pub fn grammar_kind(&self) -> GrammarKind {
        self.grammar_kind
    }

    /// Number of the section this sense was parsed under.
    pub fn section_num(&self) -> u32 {
        self.section_num
    }

    /// Relations to other words, sorted by kind name.
    pub fn relations(&self) -> &[WordRelation] {
        &self.relations
    }

    /// Add a relation unless an equal one (kind and target) is present,
    /// keeping the list sorted.
    pub fn add_relation(&mut self, rel: WordRelation) {
        if let Err(pos) = self.relations.binary_search(&rel) {
            self.relations.insert(pos, rel);
        }
    }

    /// Whether every attribute in `attrs` (sorted) is set on this entry.
    pub fn has_word_attrs(&self, attrs: &[WordAttr]) -> bool {
        sorted_subset(&self.word_attrs, attrs)
    }

    pub fn has_defn(&self, defn: &str) -> bool {
        self.defns.iter().any(|d| d == defn)
    }

    /// Whether two senses describe the same kind of word: same part of
    /// speech, same attribute set, and positionally equal relation kinds.
    /// Relation *targets* are deliberately not compared; a "genitive of X"
    /// and a "genitive of Y" sense are compatible.
    pub fn can_merge(&self, other: &DictEntry) -> bool {
        self.grammar_kind == other.grammar_kind
            && self.word_attrs == other.word_attrs
            && self.relations.len() == other.relations.len()
            && self
                .relations
                .iter()
                .zip(&other.relations)
                .all(|(a, b)| a.kind == b.kind)
    }

    /// Union two compatible senses: definitions deduplicated in
    /// lexicographic order, relations deduplicated by kind and target.
    pub fn merge(&self, other: &DictEntry) -> DictEntry {
        let mut defns: Vec<String> = self.defns.iter().chain(&other.defns).cloned().collect();
        defns.sort();
        defns.dedup();

        let mut relations: Vec<WordRelation> =
            self.relations.iter().chain(&other.relations).cloned().collect();
        relations.sort();
        relations.dedup();

        DictEntry {
            word_attrs: self.word_attrs.clone(),
            defns,
            grammar_kind: self.grammar_kind,
            section_num: self.section_num,
            relations,
        }
    }
}

type EntryTable = HashMap<String, Vec<DictEntry>>;

/// The parsed dictionary: both direction tables, their sorted key lists,
/// and section metadata. Read-only after construction.
#[derive(Clone, Debug)]
pub struct Dictionary {
    engl_to_akk: EntryTable,
    akk_to_engl: EntryTable,
    engl_keys: Vec<String>,
    akk_keys: Vec<String>,
    total_records: usize,
    sections: Vec<Section>,
}

impl Dictionary {
    /// Parse the full lexicon text into a dictionary.
    ///
    /// Lines are processed independently, 1-indexed for diagnostics.
    /// Structural problems (bad field count, unknown codes, malformed
    /// section headers or relation tokens) abort the parse; lines with an
    /// unrecognized leading character and relations whose target cannot be
    /// found are skipped with a warning.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut engl_to_akk = EntryTable::new();
        let mut akk_to_engl = EntryTable::new();
        let mut engl_keys: Vec<String> = Vec::new();
        let mut akk_keys: Vec<String> = Vec::new();
        let mut sections: Vec<Section> = Vec::new();
        let mut unresolved: Vec<(String, GrammarKind, Vec<WordRelation>)> = Vec::new();
        let mut current_section = 0u32;
        let mut total_records = 0usize;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_num = idx + 1;
            let line = raw_line.trim();
            let Some(first) = line.chars().next() else {
                continue;
            };

            if first == SECTION_MARKER {
                let section = parse_section_header(line, line_num)?;
                current_section = section.num;
                sections.push(section);
                continue;
            }

            if !AKKADIAN_ALPHABET.contains(&first) {
                warn!("line {line_num}: skipping unrecognized leading character {first:?}");
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if !(3..=4).contains(&fields.len()) {
                return Err(ParseError::FieldCount {
                    line: line_num,
                    count: fields.len(),
                });
            }

            let akk_word = fields[0];
            let defns: Vec<String> = fields[1].split(';').map(str::to_string).collect();
            let grammar_kind =
                GrammarKind::from_code(fields[2]).ok_or_else(|| ParseError::UnknownGrammarKind {
                    line: line_num,
                    code: fields[2].to_string(),
                })?;

            let (attrs, relations) = if fields.len() == 4 {
                let parsed = parse_attr_field(fields[3], line_num)?;
                unresolved.push((akk_word.to_string(), grammar_kind, parsed.1.clone()));
                parsed
            } else {
                (Vec::new(), Vec::new())
            };

            let akk_entry = DictEntry::new(
                attrs.clone(),
                defns.clone(),
                grammar_kind,
                current_section,
                relations.clone(),
            );
            insert_entry(&mut akk_to_engl, &mut akk_keys, akk_word, akk_entry);

            for engl in &defns {
                let engl_entry = DictEntry::new(
                    attrs.clone(),
                    vec![akk_word.to_string()],
                    grammar_kind,
                    current_section,
                    relations.clone(),
                );
                insert_entry(&mut engl_to_akk, &mut engl_keys, engl, engl_entry);
            }

            if let Some(section) = sections.iter_mut().find(|s| s.num == current_section) {
                section.size += 1;
            }
            total_records += 1;
        }

        // Relations can point forward in the file, so resolution waits
        // until the Akkadian table is complete.
        for (word, grammar_kind, rels) in &unresolved {
            resolve_relations(&mut akk_to_engl, word, *grammar_kind, rels);
        }

        akk_keys.sort();
        engl_keys.sort();

        if sections.is_empty() {
            sections.push(Section {
                num: 0,
                name: DEFAULT_SECTION_NAME.to_string(),
                size: total_records,
            });
        }

        info!(
            "read {total_records} records, {} Akkadian keys, {} English keys, {} sections",
            akk_keys.len(),
            engl_keys.len(),
            sections.len()
        );

        Ok(Self {
            engl_to_akk,
            akk_to_engl,
            engl_keys,
            akk_keys,
            total_records,
            sections,
        })
    }

    /// Parse from a provenance-tagged source, logging where it came from.
    pub fn from_source(source: &LexiconSource) -> Result<Self, ParseError> {
        match source.version {
            Some(version) => info!("parsing lexicon version {version} ({})", source.origin),
            None => info!("parsing lexicon of unknown version ({})", source.origin),
        }
        Self::parse(&source.text)
    }

    /// All senses recorded for `word` in the given direction, or an empty
    /// slice when the word is absent.
    pub fn get_defn(&self, word: &str, dir: Direction) -> &[DictEntry] {
        self.table(dir)
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sorted key list for one direction.
    pub fn keys(&self, dir: Direction) -> &[String] {
        match dir {
            Direction::EnglishToAkkadian => &self.engl_keys,
            Direction::AkkadianToEnglish => &self.akk_keys,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of lexicon records ingested at parse time. Projections carry
    /// this through unchanged.
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Search the key list for one direction.
    ///
    /// English queries use substring matching. Akkadian queries up to
    /// `cutoff` characters use diacritic-folded prefix matching; longer
    /// ones fall back to fuzzy matching with `cutoff` doubling as the
    /// maximum edit distance.
    pub fn search(&self, query: &str, limit: usize, cutoff: usize, dir: Direction) -> Vec<String> {
        match dir {
            Direction::EnglishToAkkadian => {
                sarrum_search::substring_search(&self.engl_keys, query, limit)
            }
            Direction::AkkadianToEnglish => {
                if query.chars().count() <= cutoff {
                    sarrum_search::prefix_search(&self.akk_keys, query, limit)
                } else {
                    sarrum_search::fuzzy_search(&self.akk_keys, query, limit, cutoff)
                }
            }
        }
    }

    /// Pick an arbitrary (word, sense) pair for practice quizzes.
    pub fn random_entry(&self, dir: Direction) -> Option<(&str, &DictEntry)> {
        let keys = self.keys(dir);
        if keys.is_empty() {
            return None;
        }

        // xorshift64 seeded from the clock; no stronger randomness needed.
        let mut state = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e37_79b9_7f4a_7c15)
            | 1;
        let mut next = |bound: usize| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % bound as u64) as usize
        };

        let word = &keys[next(keys.len())];
        let entries = self.table(dir).get(word)?;
        let entry = &entries[next(entries.len())];
        Some((word, entry))
    }

    /// Derive a view restricted to the given section numbers.
    ///
    /// `None`, or a set equal to this dictionary's own section numbers,
    /// returns the dictionary itself. Otherwise every surviving entry is
    /// copied, so the projection shares no mutable state with its source.
    pub fn with_sections(&self, active: Option<&[u32]>) -> Cow<'_, Self> {
        let Some(active) = active else {
            return Cow::Borrowed(self);
        };

        let own: HashSet<u32> = self.sections.iter().map(|s| s.num).collect();
        let requested: HashSet<u32> = active.iter().copied().collect();
        if own == requested {
            return Cow::Borrowed(self);
        }

        let (akk_to_engl, akk_keys) = filter_table(&self.akk_to_engl, &requested);
        let (engl_to_akk, engl_keys) = filter_table(&self.engl_to_akk, &requested);
        let sections = self
            .sections
            .iter()
            .filter(|s| requested.contains(&s.num))
            .cloned()
            .collect();

        Cow::Owned(Self {
            engl_to_akk,
            akk_to_engl,
            engl_keys,
            akk_keys,
            total_records: self.total_records,
            sections,
        })
    }

    fn table(&self, dir: Direction) -> &EntryTable {
        match dir {
            Direction::EnglishToAkkadian => &self.engl_to_akk,
            Direction::AkkadianToEnglish => &self.akk_to_engl,
        }
    }
}

/// Append `entry` to the word's sense list, or merge it into the first
/// compatible existing sense.
fn insert_entry(table: &mut EntryTable, keys: &mut Vec<String>, word: &str, entry: DictEntry) {
    match table.get_mut(word) {
        None => {
            table.insert(word.to_string(), vec![entry]);
            keys.push(word.to_string());
        }
        Some(entries) => {
            for existing in entries.iter_mut() {
                if existing.can_merge(&entry) {
                    *existing = existing.merge(&entry);
                    return;
                }
            }
            entries.push(entry);
        }
    }
}

/// Attach the inverse of every user-declared relation of `word` to the
/// matching target entry. A missing target is a warning, not a failure;
/// the forward relation on `word` stays either way.
fn resolve_relations(
    table: &mut EntryTable,
    word: &str,
    grammar_kind: GrammarKind,
    rels: &[WordRelation],
) {
    for rel in rels {
        match rel.kind {
            WordRelationKind::PreteriteOf => {
                if let Some(entry) =
                    find_filtered(table, &rel.word, &[GrammarKind::Verb], &[WordAttr::Infinitive])
                {
                    entry.add_relation(WordRelation::new(WordRelationKind::HasPreterite, word));
                } else {
                    warn!("unknown infinitive mapped by preterite: {}", rel.word);
                }
            }
            WordRelationKind::VerbalAdjOf => {
                if let Some(entry) =
                    find_filtered(table, &rel.word, &[GrammarKind::Verb], &[WordAttr::Infinitive])
                {
                    entry.add_relation(WordRelation::new(WordRelationKind::HasVerbalAdj, word));
                } else {
                    warn!("unknown infinitive mapped by verbal adj: {}", rel.word);
                }
            }
            WordRelationKind::SubstOf => {
                if let Some(entry) = find_filtered(table, &rel.word, &[GrammarKind::Adjective], &[])
                {
                    entry.add_relation(WordRelation::new(WordRelationKind::HasSubst, word));
                } else {
                    warn!("unknown adjective mapped by substantivized noun: {}", rel.word);
                }
            }
            WordRelationKind::BoundFormOf => {
                let inverse = WordRelation::new(WordRelationKind::HasBoundForm, word);
                if let Some(entry) = find_filtered(table, &rel.word, &[grammar_kind], &[]) {
                    entry.add_relation(inverse);
                } else if let Some(entry) =
                    find_filtered(table, &rel.word, &[GrammarKind::Verb], &[WordAttr::Infinitive])
                {
                    entry.add_relation(inverse);
                } else {
                    warn!("unknown n/adj/v mapped by bound form: {}", rel.word);
                }
            }
            WordRelationKind::GenitiveOf => {
                if let Some(entry) =
                    find_filtered(table, &rel.word, &[grammar_kind], &[WordAttr::Nominative])
                {
                    entry.add_relation(WordRelation::new(WordRelationKind::HasGenitive, word));
                } else {
                    warn!("unknown n/adj/pr mapped by genitive case: {}", rel.word);
                }
            }
            WordRelationKind::AccusativeOf => {
                if let Some(entry) =
                    find_filtered(table, &rel.word, &[grammar_kind], &[WordAttr::Nominative])
                {
                    entry.add_relation(WordRelation::new(WordRelationKind::HasAccusative, word));
                } else {
                    warn!("unknown n/adj/pr mapped by accusative case: {}", rel.word);
                }
            }
            WordRelationKind::DativeOf => {
                if let Some(entry) =
                    find_filtered(table, &rel.word, &[grammar_kind], &[WordAttr::Nominative])
                {
                    entry.add_relation(WordRelation::new(WordRelationKind::HasDative, word));
                } else {
                    warn!("unknown n/adj/pr mapped by dative case: {}", rel.word);
                }
            }
            // Base declares shape only; inferred kinds never appear in the
            // source text.
            _ => {}
        }
    }
}

/// First sense of `word` matching one of `kinds` and carrying all of
/// `attrs` (sorted).
fn find_filtered<'a>(
    table: &'a mut EntryTable,
    word: &str,
    kinds: &[GrammarKind],
    attrs: &[WordAttr],
) -> Option<&'a mut DictEntry> {
    table
        .get_mut(word)?
        .iter_mut()
        .find(|entry| kinds.contains(&entry.grammar_kind) && entry.has_word_attrs(attrs))
}

/// Parse a `§<num><whitespace><name>` header line.
fn parse_section_header(line: &str, line_num: usize) -> Result<Section, ParseError> {
    let rest = &line[SECTION_MARKER.len_utf8()..];

    if let Some((num_part, name_part)) = rest.split_once(|c: char| c.is_whitespace()) {
        let name = name_part.trim();
        if let (Ok(num), false) = (num_part.parse::<u32>(), name.is_empty()) {
            return Ok(Section {
                num,
                name: name.to_string(),
                size: 0,
            });
        }
    }

    Err(ParseError::MalformedSectionHeader {
        line: line_num,
        header: line.to_string(),
    })
}

/// Split the fourth record field into attribute codes and `name(target)`
/// relation tokens.
fn parse_attr_field(
    raw: &str,
    line_num: usize,
) -> Result<(Vec<WordAttr>, Vec<WordRelation>), ParseError> {
    let mut attrs = Vec::new();
    let mut relations = Vec::new();

    for token in raw.split(';') {
        match token.find('(') {
            None => {
                let attr = WordAttr::from_code(token).ok_or_else(|| ParseError::UnknownAttr {
                    line: line_num,
                    token: token.to_string(),
                })?;
                if !attrs.contains(&attr) {
                    attrs.push(attr);
                }
            }
            Some(lpos) => {
                let rpos = token.find(')').filter(|r| *r > lpos).ok_or_else(|| {
                    ParseError::MalformedRelation {
                        line: line_num,
                        token: token.to_string(),
                    }
                })?;
                let name = &token[..lpos];
                let target = &token[lpos + 1..rpos];
                let kind = WordRelationKind::from_user_code(name).ok_or_else(|| {
                    ParseError::UnknownRelation {
                        line: line_num,
                        name: name.to_string(),
                    }
                })?;
                relations.push(WordRelation::new(kind, target));
            }
        }
    }

    Ok((attrs, relations))
}

fn filter_table(table: &EntryTable, active: &HashSet<u32>) -> (EntryTable, Vec<String>) {
    let mut filtered = EntryTable::new();
    let mut keys = Vec::new();

    for (word, entries) in table {
        let kept: Vec<DictEntry> = entries
            .iter()
            .filter(|entry| active.contains(&entry.section_num))
            .cloned()
            .collect();
        if !kept.is_empty() {
            keys.push(word.clone());
            filtered.insert(word.clone(), kept);
        }
    }

    keys.sort();
    (filtered, keys)
}

/// Whether all of `needles` occur in `haystack`. Both slices must be
/// sorted by the same ordering.
fn sorted_subset<T: PartialEq>(haystack: &[T], needles: &[T]) -> bool {
    let mut rest = haystack.iter();
    needles.iter().all(|needle| rest.by_ref().any(|t| t == needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(kind: WordRelationKind, word: &str) -> WordRelation {
        WordRelation::new(kind, word)
    }

    #[test]
    fn entry_sorts_attrs_and_relations_on_construction() {
        let entry = DictEntry::new(
            vec![WordAttr::Nominative, WordAttr::Masculine, WordAttr::Singular],
            vec!["king".into()],
            GrammarKind::Noun,
            0,
            vec![
                rel(WordRelationKind::GenitiveOf, "šarrum"),
                rel(WordRelationKind::AccusativeOf, "šarrum"),
            ],
        );

        assert_eq!(
            entry.word_attrs(),
            [WordAttr::Masculine, WordAttr::Singular, WordAttr::Nominative]
        );
        assert_eq!(entry.relations()[0].kind, WordRelationKind::AccusativeOf);
        assert_eq!(entry.relations()[1].kind, WordRelationKind::GenitiveOf);
    }

    #[test]
    fn add_relation_is_idempotent_and_keeps_order() {
        let mut entry = DictEntry::new(vec![], vec!["king".into()], GrammarKind::Noun, 0, vec![]);
        entry.add_relation(rel(WordRelationKind::HasGenitive, "šarrim"));
        entry.add_relation(rel(WordRelationKind::HasAccusative, "šarram"));
        entry.add_relation(rel(WordRelationKind::HasGenitive, "šarrim"));

        assert_eq!(entry.relations().len(), 2);
        assert!(entry.relations().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn merge_with_self_is_idempotent() {
        let entry = DictEntry::new(
            vec![WordAttr::Nominative],
            vec!["king".into(), "ruler".into()],
            GrammarKind::Noun,
            0,
            vec![rel(WordRelationKind::Base, "šarr")],
        );

        let merged = entry.merge(&entry);
        assert_eq!(merged.defns(), ["king", "ruler"]);
        assert_eq!(merged.relations().len(), 1);

        let again = merged.merge(&merged);
        assert_eq!(again, merged);
    }

    #[test]
    fn merge_unions_definitions_lexicographically() {
        let a = DictEntry::new(vec![], vec!["ruler".into()], GrammarKind::Noun, 0, vec![]);
        let b = DictEntry::new(
            vec![],
            vec!["king".into(), "ruler".into()],
            GrammarKind::Noun,
            0,
            vec![],
        );
        assert!(a.can_merge(&b));
        assert_eq!(a.merge(&b).defns(), ["king", "ruler"]);
    }

    #[test]
    fn compatibility_ignores_relation_targets() {
        let a = DictEntry::new(
            vec![],
            vec!["of the king".into()],
            GrammarKind::Noun,
            0,
            vec![rel(WordRelationKind::GenitiveOf, "šarrum")],
        );
        let b = DictEntry::new(
            vec![],
            vec!["of the man".into()],
            GrammarKind::Noun,
            0,
            vec![rel(WordRelationKind::GenitiveOf, "awīlum")],
        );
        assert!(a.can_merge(&b));

        let merged = a.merge(&b);
        assert_eq!(merged.relations().len(), 2);
    }

    #[test]
    fn compatibility_requires_same_shape() {
        let noun = DictEntry::new(vec![], vec!["king".into()], GrammarKind::Noun, 0, vec![]);
        let verb = DictEntry::new(vec![], vec!["king".into()], GrammarKind::Verb, 0, vec![]);
        assert!(!noun.can_merge(&verb));

        let nom = DictEntry::new(
            vec![WordAttr::Nominative],
            vec!["king".into()],
            GrammarKind::Noun,
            0,
            vec![],
        );
        assert!(!noun.can_merge(&nom));
    }

    #[test]
    fn sorted_subset_respects_order() {
        let haystack = [1, 3, 5, 7];
        assert!(sorted_subset(&haystack, &[3, 7]));
        assert!(sorted_subset(&haystack, &[]));
        assert!(!sorted_subset(&haystack, &[2]));
        assert!(!sorted_subset(&haystack, &[7, 3]));
    }
}
