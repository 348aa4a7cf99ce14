//! Command resolver - exact lookup with a fuzzy fallback for typos

use std::collections::HashMap;
use std::sync::Arc;

use super::trait_def::CommandSpec;

/// Fuzzy candidates must score strictly above this
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 60;

/// Similarity of two strings on a 0-100 scale.
///
/// `100 * (|a| + |b| - d) / (|a| + |b|)` where `d` is the insertion/deletion
/// edit distance, rounded half to even. Counts Unicode scalar values.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    // |a| + |b| - d == 2 * lcs
    let matched = 2 * longest_common_subsequence(&a, &b);
    let numerator = 100 * matched;
    let mut score = numerator / total;
    let remainder = numerator % total;
    if 2 * remainder > total || (2 * remainder == total && score % 2 == 1) {
        score += 1;
    }
    score as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// How a command word was resolved
#[derive(Debug, Clone)]
pub struct Resolved {
    pub spec: Arc<CommandSpec>,
    /// 100 for exact hits
    pub score: u8,
    pub exact: bool,
}

/// Global command table.
///
/// Keeps the order in which words were first registered; re-registering a
/// word replaces its spec but not its position.
#[derive(Debug, Default, Clone)]
pub struct CommandTable {
    commands: HashMap<String, Arc<CommandSpec>>,
    order: Vec<String>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command, returning the spec it replaced
    pub fn insert(&mut self, spec: CommandSpec) -> Option<Arc<CommandSpec>> {
        let word = spec.word.clone();
        let replaced = self.commands.insert(word.clone(), Arc::new(spec));
        if replaced.is_none() {
            self.order.push(word);
        }
        replaced
    }

    pub fn get(&self, word: &str) -> Option<&Arc<CommandSpec>> {
        self.commands.get(word)
    }

    /// Commands in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandSpec>> {
        self.order.iter().filter_map(|word| self.commands.get(word))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolve a lower-cased command word.
    ///
    /// An exact hit always wins. Otherwise the best scoring word above
    /// `threshold` is picked; on equal scores the word registered first wins.
    pub fn resolve(&self, word: &str, threshold: u8) -> Option<Resolved> {
        if word.is_empty() {
            return None;
        }

        if let Some(spec) = self.commands.get(word) {
            return Some(Resolved {
                spec: spec.clone(),
                score: 100,
                exact: true,
            });
        }

        let mut best: Option<(&str, u8)> = None;
        for candidate in self.words() {
            let score = ratio(word, candidate);
            if score <= threshold {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }

        let (candidate, score) = best?;
        tracing::debug!("Fuzzy matched '{}' to '{}' ({})", word, candidate, score);
        self.commands.get(candidate).map(|spec| Resolved {
            spec: spec.clone(),
            score,
            exact: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::trait_def::HandlerResult;
    use crate::domain::entities::CommandInvocation;

    async fn noop(_invocation: CommandInvocation) -> HandlerResult {
        Ok(())
    }

    fn table_of(words: &[&str]) -> CommandTable {
        let mut table = CommandTable::new();
        for word in words {
            table.insert(CommandSpec::new(*word, "", noop));
        }
        table
    }

    #[test]
    fn test_ratio_known_values() {
        assert_eq!(ratio("ping", "ping"), 100);
        assert_eq!(ratio("pign", "ping"), 75);
        assert_eq!(ratio("pign", "pong"), 50);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", ""), 100);
        assert_eq!(ratio("", "ping"), 0);
    }

    #[test]
    fn test_ratio_rounds_half_to_even() {
        // lcs 1 over 8 chars: 25.0
        assert_eq!(ratio("abcd", "wxya"), 25);
        // lcs 1 over 16 chars: 12.5 -> 12
        assert_eq!(ratio("abcdefgh", "zzzzzzza"), 12);
        // lcs 3 over 16 chars: 37.5 -> 38
        assert_eq!(ratio("abcdefgh", "zzzzzabc"), 38);
    }

    #[test]
    fn test_exact_match_skips_fuzzy() {
        let table = table_of(&["date_add", "date"]);
        let resolved = table.resolve("date", DEFAULT_FUZZY_THRESHOLD).unwrap();

        assert!(resolved.exact);
        assert_eq!(resolved.spec.word, "date");
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let table = table_of(&["ping", "pong"]);
        let resolved = table.resolve("pign", DEFAULT_FUZZY_THRESHOLD).unwrap();

        assert!(!resolved.exact);
        assert_eq!(resolved.spec.word, "ping");
        assert_eq!(resolved.score, 75);
    }

    #[test]
    fn test_no_match_at_or_below_threshold() {
        let table = table_of(&["ping"]);
        assert!(table.resolve("xyz", DEFAULT_FUZZY_THRESHOLD).is_none());
        // "pi" vs "ping" scores 67, so a threshold of 67 rejects it
        assert!(table.resolve("pi", 67).is_none());
        assert!(table.resolve("pi", 66).is_some());
        assert!(table.resolve("", DEFAULT_FUZZY_THRESHOLD).is_none());
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let table = table_of(&["pong", "ping"]);
        // "pxng" scores 75 against both
        let resolved = table.resolve("pxng", DEFAULT_FUZZY_THRESHOLD).unwrap();
        assert_eq!(resolved.spec.word, "pong");

        let table = table_of(&["ping", "pong"]);
        let resolved = table.resolve("pxng", DEFAULT_FUZZY_THRESHOLD).unwrap();
        assert_eq!(resolved.spec.word, "ping");
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut table = table_of(&["a", "b"]);
        let replaced = table.insert(CommandSpec::new("a", "new help", noop));

        assert!(replaced.is_some());
        assert_eq!(table.words().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get("a").unwrap().help, "new help");
        assert_eq!(table.len(), 2);
    }
}
