//! Loads a custom rule list for `-r`, falling back to
//! [`steg_crack::default_rules`] when no file is given.
//!
//! One rule name per line: `asis`, `lowercase`, `uppercase`, `capitalize`,
//! `reverse`, or `appenddigit:N`. This is a simplified stand-in for the
//! reference tool's external rule-preprocessor grammar, which isn't
//! available in source form (see [`steg_crack::wordlist`]'s module docs).

use std::path::Path;

use steg_crack::{default_rules, Rule};

use crate::error::Result;

pub fn load(path: Option<&Path>) -> Result<Vec<Rule>> {
    let Some(path) = path else {
        return Ok(default_rules());
    };

    let text = std::fs::read_to_string(path)?;
    let mut rules = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let rule = match line.to_lowercase().as_str() {
            "asis" => Rule::AsIs,
            "lowercase" => Rule::Lowercase,
            "uppercase" => Rule::Uppercase,
            "capitalize" => Rule::Capitalize,
            "reverse" => Rule::Reverse,
            other => match other.strip_prefix("appenddigit:").and_then(|d| d.parse().ok()) {
                Some(d) => Rule::AppendDigit(d),
                None => {
                    log::warn!("skipping unrecognized rule \"{other}\"");
                    continue;
                }
            },
        };
        rules.push(rule);
    }

    if rules.is_empty() {
        rules = default_rules();
    }
    Ok(rules)
}
