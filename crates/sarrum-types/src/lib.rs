//! Shared vocabulary types that mirror the sarrum lexicon's text format.
//!
//! The lexicon is a flat, comma-separated file in which every grammatical
//! marker is a short canonical code (`n` for nouns, `nom` for nominatives,
//! `pret(...)` for preterite relations, and so on). This crate owns the
//! closed enumerations behind those codes and the code↔enum lookup tables,
//! so the parser and the search/service layers can share them without
//! pulling in each other.
//!
//! Reverse lookup is a linear scan over a table of under twenty entries;
//! failure is an `Option`, never a panic.
//!
//! ```rust
//! use sarrum_types::{GrammarKind, WordRelationKind};
//!
//! assert_eq!(GrammarKind::from_code("apr"), Some(GrammarKind::AnaphoricPronoun));
//! assert_eq!(WordRelationKind::from_user_code("pret"), Some(WordRelationKind::PreteriteOf));
//! assert_eq!(WordRelationKind::HasPreterite.label(), "Preterite");
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Part of speech as encoded in the third field of a lexicon record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GrammarKind {
    Noun,
    Pronoun,
    AnaphoricPronoun,
    Adjective,
    Article,
    Conjunction,
    Preposition,
    Verb,
    Adverb,
}

const GRAMMAR_CODES: &[(GrammarKind, &str)] = &[
    (GrammarKind::Noun, "n"),
    (GrammarKind::Pronoun, "pr"),
    (GrammarKind::AnaphoricPronoun, "apr"),
    (GrammarKind::Adjective, "adj"),
    (GrammarKind::Article, "art"),
    (GrammarKind::Conjunction, "conj"),
    (GrammarKind::Preposition, "prep"),
    (GrammarKind::Verb, "v"),
    (GrammarKind::Adverb, "adv"),
];

impl GrammarKind {
    /// Resolve a lexicon grammar code into an enum.
    pub fn from_code(code: &str) -> Option<Self> {
        GRAMMAR_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(kind, _)| *kind)
    }

    /// Emit the canonical code used in the lexicon text.
    pub fn code(self) -> &'static str {
        GRAMMAR_CODES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, c)| *c)
            .unwrap_or("")
    }
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GrammarKind::Noun => "noun",
            GrammarKind::Pronoun => "pronoun",
            GrammarKind::AnaphoricPronoun => "anaphoric pronoun",
            GrammarKind::Adjective => "adjective",
            GrammarKind::Article => "article",
            GrammarKind::Conjunction => "conjunction",
            GrammarKind::Preposition => "preposition",
            GrammarKind::Verb => "verb",
            GrammarKind::Adverb => "adverb",
        })
    }
}

/// Morphological tag from the optional fourth field of a lexicon record.
///
/// The derived `Ord` (declaration order) is the canonical ordering used
/// wherever an attribute set must stay sorted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum WordAttr {
    Masculine,
    Feminine,
    Singular,
    Dual,
    Plural,
    Nominative,
    Infinitive,
    GStem,
    Idiom,
    IWeak,
    IIWeak,
    IIIWeak,
}

const ATTR_CODES: &[(WordAttr, &str)] = &[
    (WordAttr::Masculine, "m"),
    (WordAttr::Feminine, "f"),
    (WordAttr::Singular, "s"),
    (WordAttr::Dual, "dual"),
    (WordAttr::Plural, "pl"),
    (WordAttr::Nominative, "nom"),
    (WordAttr::Infinitive, "inf"),
    (WordAttr::GStem, "G"),
    (WordAttr::Idiom, "id"),
    (WordAttr::IWeak, "1w"),
    (WordAttr::IIWeak, "2w"),
    (WordAttr::IIIWeak, "3w"),
];

impl WordAttr {
    /// Resolve a lexicon attribute code into an enum.
    pub fn from_code(code: &str) -> Option<Self> {
        ATTR_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(attr, _)| *attr)
    }

    /// Emit the canonical code used in the lexicon text.
    pub fn code(self) -> &'static str {
        ATTR_CODES
            .iter()
            .find(|(attr, _)| *attr == self)
            .map(|(_, c)| *c)
            .unwrap_or("")
    }
}

/// Directed, kinded link from one word sense to another word string.
///
/// The first eight kinds are user-declared in the lexicon text via
/// `code(target)` tokens; the `Has*` kinds are synthesized on the target
/// word when the parser resolves the declared relations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WordRelationKind {
    PreteriteOf,
    VerbalAdjOf,
    SubstOf,
    BoundFormOf,
    GenitiveOf,
    AccusativeOf,
    DativeOf,
    Base,
    HasPreterite,
    HasSubst,
    HasVerbalAdj,
    HasBoundForm,
    HasGenitive,
    HasAccusative,
    HasDative,
}

const USER_RELATION_CODES: &[(WordRelationKind, &str)] = &[
    (WordRelationKind::PreteriteOf, "pret"),
    (WordRelationKind::VerbalAdjOf, "va"),
    (WordRelationKind::SubstOf, "subst"),
    (WordRelationKind::BoundFormOf, "bf"),
    (WordRelationKind::GenitiveOf, "gen"),
    (WordRelationKind::AccusativeOf, "acc"),
    (WordRelationKind::DativeOf, "dat"),
    (WordRelationKind::Base, "base"),
];

impl WordRelationKind {
    /// Resolve a user-declared relation code (the `name` in `name(target)`).
    ///
    /// Inferred kinds have no code; they never appear in the source text.
    pub fn from_user_code(code: &str) -> Option<Self> {
        USER_RELATION_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(kind, _)| *kind)
    }

    /// Canonical kind name, used as the primary sort key for relations.
    pub fn name(self) -> &'static str {
        match self {
            WordRelationKind::PreteriteOf => "PreteriteOf",
            WordRelationKind::VerbalAdjOf => "VerbalAdjOf",
            WordRelationKind::SubstOf => "SubstOf",
            WordRelationKind::BoundFormOf => "BoundFormOf",
            WordRelationKind::GenitiveOf => "GenitiveOf",
            WordRelationKind::AccusativeOf => "AccusativeOf",
            WordRelationKind::DativeOf => "DativeOf",
            WordRelationKind::Base => "Base",
            WordRelationKind::HasPreterite => "HasPreterite",
            WordRelationKind::HasSubst => "HasSubst",
            WordRelationKind::HasVerbalAdj => "HasVerbalAdj",
            WordRelationKind::HasBoundForm => "HasBoundForm",
            WordRelationKind::HasGenitive => "HasGenitive",
            WordRelationKind::HasAccusative => "HasAccusative",
            WordRelationKind::HasDative => "HasDative",
        }
    }

    /// Human-readable label for display next to the related word.
    pub fn label(self) -> &'static str {
        match self {
            WordRelationKind::PreteriteOf => "Preterite of",
            WordRelationKind::VerbalAdjOf => "Verbal Adj. of",
            WordRelationKind::SubstOf => "Substantivized N. of",
            WordRelationKind::BoundFormOf => "Bound Form of",
            WordRelationKind::GenitiveOf => "Gen. of",
            WordRelationKind::AccusativeOf => "Acc. of",
            WordRelationKind::DativeOf => "Dative of",
            WordRelationKind::Base => "Base",
            WordRelationKind::HasPreterite => "Preterite",
            WordRelationKind::HasSubst => "Substantivized",
            WordRelationKind::HasVerbalAdj => "Verbal Adj.",
            WordRelationKind::HasBoundForm => "Bound Form",
            WordRelationKind::HasGenitive => "Gen.",
            WordRelationKind::HasAccusative => "Acc.",
            WordRelationKind::HasDative => "Dative",
        }
    }
}

/// Immutable (kind, target word) pair attached to a dictionary entry.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct WordRelation {
    pub kind: WordRelationKind,
    pub word: String,
}

impl WordRelation {
    pub fn new(kind: WordRelationKind, word: impl Into<String>) -> Self {
        Self {
            kind,
            word: word.into(),
        }
    }
}

/// Relations sort by kind name first so that entries with the same shape
/// compare positionally, with the target word as a deterministic tiebreak.
impl Ord for WordRelation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .name()
            .cmp(other.kind.name())
            .then_with(|| self.word.cmp(&other.word))
    }
}

impl PartialOrd for WordRelation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lookup direction through the bilingual tables.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    EnglishToAkkadian,
    AkkadianToEnglish,
}

impl Direction {
    /// Parse the short direction code used by callers (`en` / `akk`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Direction::EnglishToAkkadian),
            "akk" => Some(Direction::AkkadianToEnglish),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::EnglishToAkkadian => "en",
            Direction::AkkadianToEnglish => "akk",
        })
    }
}
