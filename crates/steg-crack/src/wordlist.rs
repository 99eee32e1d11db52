//! Rule-expanded, lazily deduplicated candidate word source (C10).
//!
//! The reference tool drives this off an external rule-preprocessor mini
//! language (`rules.c`, not present in the retrieved sources) layered on
//! John the Ripper's rule syntax. That exact grammar isn't reproduced here;
//! instead each line from the wordlist is expanded through a fixed set of
//! common mangling rules (as-is, lowercase, uppercase, capitalized,
//! reversed, with a trailing digit), consecutive duplicates against the
//! immediately preceding candidate are skipped exactly like the reference
//! tool's `last`-word check, and the whole thing is lazy: nothing is
//! collected into memory ahead of time.

use std::io::BufRead;

/// One mangling rule applied to each wordlist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    AsIs,
    Lowercase,
    Uppercase,
    Capitalize,
    Reverse,
    AppendDigit(u8),
}

/// The default rule set, applied in this order to every line.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::AsIs,
        Rule::Lowercase,
        Rule::Uppercase,
        Rule::Capitalize,
        Rule::Reverse,
        Rule::AppendDigit(0),
        Rule::AppendDigit(1),
    ]
}

fn apply_rule(word: &str, rule: Rule) -> String {
    match rule {
        Rule::AsIs => word.to_string(),
        Rule::Lowercase => word.to_lowercase(),
        Rule::Uppercase => word.to_uppercase(),
        Rule::Capitalize => {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
        Rule::Reverse => word.chars().rev().collect(),
        Rule::AppendDigit(d) => format!("{word}{d}"),
    }
}

/// Lazily yields rule-expanded candidates from a wordlist reader,
/// skipping `#!comment`-prefixed lines and any candidate identical to the
/// immediately preceding one (case-sensitive), matching the reference
/// tool's `last` buffer de-duplication.
pub struct WordlistSource<R: BufRead> {
    reader: R,
    rules: Vec<Rule>,
    rule_idx: usize,
    current_line: String,
    last: Option<String>,
    pub line_number: usize,
}

impl<R: BufRead> WordlistSource<R> {
    pub fn new(reader: R, rules: Vec<Rule>) -> Self {
        WordlistSource {
            reader,
            rules,
            rule_idx: 0,
            current_line: String::new(),
            last: None,
            line_number: 0,
        }
    }

    fn next_line(&mut self) -> Option<()> {
        loop {
            self.current_line.clear();
            let n = self.reader.read_line(&mut self.current_line).ok()?;
            if n == 0 {
                return None;
            }
            self.line_number += 1;
            let trimmed = self.current_line.trim_end_matches(['\r', '\n']);
            self.current_line = trimmed.to_string();
            if self.current_line.starts_with("#!comment") {
                continue;
            }
            self.rule_idx = 0;
            return Some(());
        }
    }
}

impl<R: BufRead> Iterator for WordlistSource<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.current_line.is_empty() && self.rule_idx == 0 {
                self.next_line()?;
            }

            while self.rule_idx < self.rules.len() {
                let rule = self.rules[self.rule_idx];
                self.rule_idx += 1;
                let candidate = apply_rule(&self.current_line, rule);

                if self.last.as_deref() == Some(candidate.as_str()) {
                    continue;
                }
                self.last = Some(candidate.clone());
                return Some(candidate);
            }

            // Rules exhausted for this line; advance.
            self.current_line.clear();
            if self.next_line().is_none() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_expands_each_line_through_all_rules() {
        let data = b"Pass\n".to_vec();
        let source = WordlistSource::new(Cursor::new(data), default_rules());
        let words: Vec<String> = source.collect();
        assert!(words.contains(&"Pass".to_string()));
        assert!(words.contains(&"pass".to_string()));
        assert!(words.contains(&"PASS".to_string()));
        assert!(words.contains(&"ssaP".to_string()));
    }

    #[test]
    fn test_skips_comment_lines() {
        let data = b"#!comment not a word\nhello\n".to_vec();
        let source = WordlistSource::new(Cursor::new(data), vec![Rule::AsIs]);
        let words: Vec<String> = source.collect();
        assert_eq!(words, vec!["hello".to_string()]);
    }

    #[test]
    fn test_skips_consecutive_duplicate_candidates() {
        let data = b"ab\nab\n".to_vec();
        let source = WordlistSource::new(Cursor::new(data), vec![Rule::AsIs]);
        let words: Vec<String> = source.collect();
        assert_eq!(words, vec!["ab".to_string()]);
    }
}
