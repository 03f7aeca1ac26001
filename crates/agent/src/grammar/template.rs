//! Sentence-template compilation and matching.
//!
//! A bundle sentence like `turn on [all] [the] (light | lights)` is parsed
//! into a small tree and then expanded into flat branches, one per
//! combination of optionals and alternations, each a sequence of literal
//! words and slot captures. Matching a branch against an utterance is then a simple
//! backtracking walk: list-constrained slots try their values in list order,
//! free-text slots capture the longest span first.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use super::GrammarError;

/// One element of an expanded branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Part {
    Word(String),
    Slot(String),
}

/// A fully expanded alternative of one sentence template.
#[derive(Debug, Clone)]
pub(crate) struct Branch {
    pub(crate) parts: Vec<Part>,
    /// Number of literal words; the dominant specificity input.
    pub(crate) literals: usize,
}

/// One bundle sentence compiled for an intent.
#[derive(Debug, Clone)]
pub(crate) struct CompiledTemplate {
    pub(crate) intent: String,
    pub(crate) fixed_slots: BTreeMap<String, String>,
    pub(crate) branches: Vec<Branch>,
}

#[derive(Debug, Clone)]
enum Node {
    Word(String),
    Slot(String),
    /// `[ ... ]` — may be skipped entirely.
    Optional(Vec<Vec<Node>>),
    /// `( a | b )` — exactly one alternative.
    Group(Vec<Vec<Node>>),
}

/// Compile one sentence into its expanded branches.
///
/// # Errors
///
/// Returns [`GrammarError::Template`] for unbalanced groups, empty slot
/// names, or a sentence with no matchable content.
pub(crate) fn compile_sentence(sentence: &str) -> Result<Vec<Branch>, GrammarError> {
    let template_error = |reason: String| GrammarError::Template {
        sentence: sentence.to_string(),
        reason,
    };

    let mut chars = sentence.chars().peekable();
    let alternatives = parse_alternatives(&mut chars, None).map_err(template_error)?;

    let branches: Vec<Branch> = expand_alternatives(&alternatives)
        .into_iter()
        .filter(|parts| !parts.is_empty())
        .map(|parts| {
            let literals = parts.iter().filter(|part| matches!(part, Part::Word(_))).count();
            Branch { parts, literals }
        })
        .collect();

    if branches.is_empty() {
        return Err(GrammarError::Template {
            sentence: sentence.to_string(),
            reason: "sentence has no matchable content".to_string(),
        });
    }
    Ok(branches)
}

/// Parse a `|`-separated list of sequences up to `terminator` (or the end of
/// input when `None`).
fn parse_alternatives(
    chars: &mut Peekable<Chars<'_>>,
    terminator: Option<char>,
) -> Result<Vec<Vec<Node>>, String> {
    let mut alternatives: Vec<Vec<Node>> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut word = String::new();

    fn flush_word(word: &mut String, current: &mut Vec<Node>) {
        if !word.is_empty() {
            let lowered = std::mem::take(word).to_lowercase();
            current.push(Node::Word(lowered));
        }
    }

    loop {
        let Some(&c) = chars.peek() else {
            if terminator.is_some() {
                return Err("unbalanced group".to_string());
            }
            flush_word(&mut word, &mut current);
            alternatives.push(current);
            return Ok(alternatives);
        };
        if Some(c) == terminator {
            chars.next();
            flush_word(&mut word, &mut current);
            alternatives.push(current);
            return Ok(alternatives);
        }
        match c {
            '|' => {
                chars.next();
                flush_word(&mut word, &mut current);
                alternatives.push(std::mem::take(&mut current));
            }
            '[' => {
                chars.next();
                flush_word(&mut word, &mut current);
                let inner = parse_alternatives(chars, Some(']'))?;
                current.push(Node::Optional(inner));
            }
            '(' => {
                chars.next();
                flush_word(&mut word, &mut current);
                let inner = parse_alternatives(chars, Some(')'))?;
                current.push(Node::Group(inner));
            }
            ']' | ')' => return Err("unbalanced group".to_string()),
            '{' => {
                chars.next();
                flush_word(&mut word, &mut current);
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) if !c.is_whitespace() => name.push(c),
                        _ => return Err("unterminated slot".to_string()),
                    }
                }
                if name.is_empty() {
                    return Err("empty slot name".to_string());
                }
                current.push(Node::Slot(name));
            }
            '}' => return Err("stray closing brace".to_string()),
            c if c.is_whitespace() => {
                chars.next();
                flush_word(&mut word, &mut current);
            }
            _ => {
                word.push(c);
                chars.next();
            }
        }
    }
}

fn expand_alternatives(alternatives: &[Vec<Node>]) -> Vec<Vec<Part>> {
    alternatives.iter().flat_map(|sequence| expand_sequence(sequence)).collect()
}

fn expand_sequence(sequence: &[Node]) -> Vec<Vec<Part>> {
    let mut expanded: Vec<Vec<Part>> = vec![Vec::new()];
    for node in sequence {
        let options: Vec<Vec<Part>> = match node {
            Node::Word(word) => vec![vec![Part::Word(word.clone())]],
            Node::Slot(slot) => vec![vec![Part::Slot(slot.clone())]],
            Node::Optional(inner) => {
                let mut options = expand_alternatives(inner);
                options.push(Vec::new());
                options
            }
            Node::Group(inner) => expand_alternatives(inner),
        };
        expanded = expanded
            .iter()
            .flat_map(|prefix| {
                options.iter().map(|option| {
                    let mut branch = prefix.clone();
                    branch.extend(option.iter().cloned());
                    branch
                })
            })
            .collect();
    }
    expanded
}

/// Match a branch against the full word sequence of an utterance.
///
/// Returns the captured slot values on success. The entire utterance must be
/// consumed; partial matches are rejected.
pub(crate) fn match_branch(
    branch: &Branch,
    words: &[&str],
    lists: &BTreeMap<String, Vec<String>>,
) -> Option<BTreeMap<String, String>> {
    let mut slots = BTreeMap::new();
    if match_parts(&branch.parts, words, lists, &mut slots) {
        Some(slots)
    } else {
        None
    }
}

fn match_parts(
    parts: &[Part],
    words: &[&str],
    lists: &BTreeMap<String, Vec<String>>,
    slots: &mut BTreeMap<String, String>,
) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return words.is_empty();
    };
    match first {
        Part::Word(expected) => {
            words.first() == Some(&expected.as_str())
                && match_parts(rest, &words[1..], lists, slots)
        }
        Part::Slot(name) => {
            if let Some(values) = lists.get(name) {
                // List slots try values in list order so matches are
                // deterministic.
                for value in values {
                    let value_words: Vec<&str> = value.split_whitespace().collect();
                    if words.len() >= value_words.len()
                        && words[..value_words.len()] == value_words[..]
                    {
                        slots.insert(name.clone(), value.clone());
                        if match_parts(rest, &words[value_words.len()..], lists, slots) {
                            return true;
                        }
                        slots.remove(name);
                    }
                }
                false
            } else {
                // Free-text slots capture at least one word, longest first.
                for take in (1..=words.len()).rev() {
                    slots.insert(name.clone(), words[..take].join(" "));
                    if match_parts(rest, &words[take..], lists, slots) {
                        return true;
                    }
                }
                slots.remove(name);
                false
            }
        }
    }
}
