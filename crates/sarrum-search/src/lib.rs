//! Matching strategies over the dictionary's sorted key lists.
//!
//! Three independent matchers, selected by the caller based on query
//! language and length; none depends on the others and none knows how the
//! keys were produced:
//!
//! 1. [`substring_search`] — case-sensitive substring match for English.
//! 2. [`prefix_search`] — prefix match for Akkadian with diacritic folding,
//!    meant for short queries.
//! 3. [`fuzzy_search`] — hybrid Levenshtein/Hamming edit distance for longer
//!    Akkadian queries, again under diacritic folding.
//!
//! Diacritic folding collapses the marked/unmarked variants used in
//! Akkadian transliteration ({š ṣ s}, {t ṭ}, {h ẖ} and the long/circumflex
//! vowels), so a plain-keyboard query like `sarrum` still finds `šarrum`.
//!
//! All result lists are deterministic: stable sorts over the caller's key
//! order, truncated to the caller's limit.

/// Collapse a transliteration character to its unmarked representative.
///
/// Characters outside the folding groups map to themselves.
pub fn fold_char(c: char) -> char {
    match c {
        'š' | 'ṣ' => 's',
        'ṭ' => 't',
        'ẖ' => 'h',
        'ā' | 'â' => 'a',
        'ē' | 'ê' => 'e',
        'ī' | 'î' => 'i',
        'ū' | 'û' => 'u',
        _ => c,
    }
}

/// Character equality without regard to diacritical marks.
pub fn chars_match(a: char, b: char) -> bool {
    fold_char(a) == fold_char(b)
}

/// Every key containing `query` as a literal substring, shortest first.
pub fn substring_search(keys: &[String], query: &str, limit: usize) -> Vec<String> {
    let mut out: Vec<String> = keys
        .iter()
        .filter(|key| key.contains(query))
        .cloned()
        .collect();

    out.sort_by_key(|key| key.chars().count());
    out.truncate(limit);
    out
}

/// Every key whose leading characters fold-match `query`, shortest first.
pub fn prefix_search(keys: &[String], query: &str, limit: usize) -> Vec<String> {
    let query: Vec<char> = query.chars().collect();
    let mut out: Vec<String> = keys
        .iter()
        .filter(|key| starts_with_folded(key, &query))
        .cloned()
        .collect();

    out.sort_by_key(|key| key.chars().count());
    out.truncate(limit);
    out
}

/// Every key within `cutoff` edits of `query`, nearest first.
///
/// Each key is scored with fold-aware Levenshtein distance; when the query
/// is no longer than the key, a positional Hamming distance over the
/// query's length is also computed and the smaller of the two wins.
/// Levenshtein alone over-penalizes a prefix-aligned near-miss, while
/// Hamming alone cannot absorb a length difference, so the minimum takes
/// whichever reading is more charitable to the typist. Ties keep the
/// caller's key order.
pub fn fuzzy_search(keys: &[String], query: &str, limit: usize, cutoff: usize) -> Vec<String> {
    let query: Vec<char> = query.chars().collect();
    let mut scored: Vec<(usize, &String)> = Vec::new();

    for key in keys {
        let key_chars: Vec<char> = key.chars().collect();
        let mut dist = edit_distance(&query, &key_chars);

        if query.len() <= key_chars.len() {
            dist = dist.min(hamming_distance(&query, &key_chars));
        }

        if dist <= cutoff {
            scored.push((dist, key));
        }
    }

    scored.sort_by_key(|(dist, _)| *dist);
    scored.truncate(limit);
    scored.into_iter().map(|(_, key)| key.clone()).collect()
}

/// Classic two-row Levenshtein with [`chars_match`] as the substitution
/// predicate (cost 0 when fold-equal). O(n·m) time, two rows of space.
pub fn edit_distance(s: &[char], t: &[char]) -> usize {
    let n = s.len();
    let m = t.len();

    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut cur: Vec<usize> = vec![0; n + 1];

    for (col, &tc) in t.iter().enumerate() {
        cur[0] = col + 1;

        for (row, &sc) in s.iter().enumerate() {
            let cost = if chars_match(sc, tc) { 0 } else { 1 };
            cur[row + 1] = (prev[row + 1] + 1)
                .min(cur[row] + 1)
                .min(prev[row] + cost);
        }

        std::mem::swap(&mut prev, &mut cur);
    }

    prev[n]
}

/// Positional mismatch count over the query's length. The caller must
/// ensure `query.len() <= key.len()`.
fn hamming_distance(query: &[char], key: &[char]) -> usize {
    query
        .iter()
        .zip(key)
        .filter(|(q, k)| !chars_match(**q, **k))
        .count()
}

fn starts_with_folded(key: &str, query: &[char]) -> bool {
    let mut chars = key.chars();
    for &q in query {
        match chars.next() {
            Some(c) if chars_match(c, q) => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn folding_is_reflexive_and_symmetric() {
        let sample = "šṣsṭtẖhāâaēêeīîiūûubdgklmnpqrwyz";
        for a in sample.chars() {
            assert!(chars_match(a, a));
            for b in sample.chars() {
                assert_eq!(chars_match(a, b), chars_match(b, a));
            }
        }
    }

    #[test]
    fn folding_groups_collapse() {
        assert!(chars_match('š', 's'));
        assert!(chars_match('ṣ', 'š'));
        assert!(chars_match('ṭ', 't'));
        assert!(chars_match('ẖ', 'h'));
        assert!(chars_match('ā', 'â'));
        assert!(chars_match('ū', 'u'));
        assert!(!chars_match('s', 't'));
        assert!(!chars_match('a', 'e'));
    }

    #[test]
    fn substring_search_is_case_sensitive_and_length_ordered() {
        let keys = keys(&["warfare", "war", "sward", "peace", "Warden"]);
        let out = substring_search(&keys, "war", 10);
        assert_eq!(out, vec!["war", "sward", "warfare"]);
    }

    #[test]
    fn substring_search_truncates_after_ordering() {
        let keys = keys(&["warfare", "war", "sward"]);
        let out = substring_search(&keys, "war", 1);
        assert_eq!(out, vec!["war"]);
    }

    #[test]
    fn prefix_search_folds_diacritics() {
        let keys = keys(&["šarrum", "sarru", "bītu"]);
        let out = prefix_search(&keys, "sar", 10);
        assert_eq!(out, vec!["sarru", "šarrum"]);
    }

    #[test]
    fn prefix_search_rejects_short_keys() {
        let keys = keys(&["ša", "šarrum"]);
        let out = prefix_search(&keys, "šar", 10);
        assert_eq!(out, vec!["šarrum"]);
    }

    #[test]
    fn fuzzy_search_scores_folded_match_as_zero() {
        let keys = keys(&["šarrum", "awīlum"]);
        let out = fuzzy_search(&keys, "sarrum", 10, 1);
        assert_eq!(out, vec!["šarrum"]);
    }

    #[test]
    fn fuzzy_search_orders_by_distance() {
        let keys = keys(&["awīlum", "šarrum", "šarrim"]);
        // "šarrum" is distance 0, "šarrim" distance 1, "awīlum" beyond 2.
        let out = fuzzy_search(&keys, "šarrum", 10, 2);
        assert_eq!(out, vec!["šarrum", "šarrim"]);
    }

    #[test]
    fn fuzzy_search_hamming_rescues_prefix_typos() {
        // One substitution inside a longer key: Levenshtein sees the
        // length gap as insertions, Hamming over the query prefix does not.
        let keys = keys(&["parāsum"]);
        let query = "pirās";
        let q: Vec<char> = query.chars().collect();
        let k: Vec<char> = "parāsum".chars().collect();
        assert!(edit_distance(&q, &k) > 1);
        let out = fuzzy_search(&keys, query, 10, 1);
        assert_eq!(out, vec!["parāsum"]);
    }

    #[test]
    fn edit_distance_handles_empty_inputs() {
        let abc: Vec<char> = "abc".chars().collect();
        assert_eq!(edit_distance(&[], &abc), 3);
        assert_eq!(edit_distance(&abc, &[]), 3);
        assert_eq!(edit_distance(&abc, &abc), 0);
    }

    #[test]
    fn edit_distance_counts_insertions_and_substitutions() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(edit_distance(&a, &b), 3);
    }
}
