//! INI-like configuration loader for rule and word-list definitions.
//!
//! Sections are introduced by `[name]`. A section whose name starts with
//! `list.` holds raw ordered lines (each tagged with its source line number
//! for error reporting); every other section holds `key = value` parameters.
//! Section and parameter names are matched case-insensitively; values keep
//! their original case. Lines starting with `#` or `;` are comments.
//!
//! Sections and parameters are unordered maps keyed by lower-cased name: a
//! later `[name]` occurrence replaces an earlier section of the same name
//! wholesale, and a later `key = value` line overrides an earlier one in the
//! same section — matching the reference loader's new-at-head lookup order.

pub mod error;

pub use error::{ConfigError, Result};

use std::collections::HashMap;
use std::path::Path;

/// One raw line from a `list.`-prefixed section, with its 1-based source
/// line number for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    pub text: String,
    pub number: usize,
}

#[derive(Debug, Clone)]
enum SectionBody {
    Params(HashMap<String, String>),
    List(Vec<ConfigLine>),
}

#[derive(Debug, Clone)]
struct Section {
    body: SectionBody,
}

/// A parsed configuration file: named sections, each either a parameter map
/// or an ordered line list.
#[derive(Debug, Clone, Default)]
pub struct Config {
    sections: HashMap<String, Section>,
}

impl Config {
    /// Parse a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse configuration text already read into memory.
    pub fn parse(text: &str, source_name: &str) -> Result<Self> {
        let mut sections: HashMap<String, Section> = HashMap::new();
        let mut current: Option<String> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let number = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(stripped) = line.strip_prefix('[') {
                let name = stripped
                    .strip_suffix(']')
                    .ok_or_else(|| ConfigError::Syntax {
                        path: source_name.to_string(),
                        line: number,
                    })?
                    .trim()
                    .to_lowercase();

                let body = if name.starts_with("list.") {
                    SectionBody::List(Vec::new())
                } else {
                    SectionBody::Params(HashMap::new())
                };
                sections.insert(name.clone(), Section { body });
                current = Some(name);
                continue;
            }

            let section_name = current.as_ref().ok_or_else(|| ConfigError::Syntax {
                path: source_name.to_string(),
                line: number,
            })?;
            let section = sections.get_mut(section_name).expect("current section always exists");

            match &mut section.body {
                SectionBody::List(lines) => lines.push(ConfigLine {
                    text: line.to_string(),
                    number,
                }),
                SectionBody::Params(params) => {
                    let eq = line.find('=').ok_or_else(|| ConfigError::Syntax {
                        path: source_name.to_string(),
                        line: number,
                    })?;
                    let key = line[..eq].trim().to_lowercase();
                    let value = line[eq + 1..].trim().to_string();
                    params.insert(key, value);
                }
            }
        }

        Ok(Config { sections })
    }

    /// Look up a parameter by section and name (both case-insensitive).
    pub fn get_param(&self, section: &str, param: &str) -> Option<&str> {
        match &self.sections.get(&section.to_lowercase())?.body {
            SectionBody::Params(params) => params.get(&param.to_lowercase()).map(String::as_str),
            SectionBody::List(_) => None,
        }
    }

    /// Look up a parameter as an integer, matching the reference loader's
    /// `atoi`-style lenient parse (non-numeric or missing yields `-1`).
    pub fn get_int(&self, section: &str, param: &str) -> i64 {
        self.get_param(section, param)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(-1)
    }

    /// Look up a parameter as a boolean: `y`/`Y`/`t`/`T` prefix is true,
    /// otherwise fall back to `atoi` truthiness (missing yields `false`).
    pub fn get_bool(&self, section: &str, param: &str) -> bool {
        match self.get_param(section, param) {
            Some(v) => match v.chars().next() {
                Some('y' | 'Y' | 't' | 'T') => true,
                _ => v.trim().parse::<i64>().unwrap_or(0) != 0,
            },
            None => false,
        }
    }

    /// Return the ordered raw lines of a `list.`-prefixed section.
    pub fn get_list(&self, section: &str) -> Result<&[ConfigLine]> {
        match &self
            .sections
            .get(&section.to_lowercase())
            .ok_or_else(|| ConfigError::MissingSection(section.to_string()))?
            .body
        {
            SectionBody::List(lines) => Ok(lines),
            SectionBody::Params(_) => Ok(&[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# comment
[Rules]
enabled = Yes
passes = 3

[list.Rules.Transform]
:
l
u
";

    #[test]
    fn test_parses_params_case_insensitively() {
        let cfg = Config::parse(SAMPLE, "test").unwrap();
        assert_eq!(cfg.get_param("rules", "ENABLED"), Some("Yes"));
        assert_eq!(cfg.get_int("rules", "passes"), 3);
        assert!(cfg.get_bool("rules", "enabled"));
    }

    #[test]
    fn test_list_section_preserves_order_and_line_numbers() {
        let cfg = Config::parse(SAMPLE, "test").unwrap();
        let lines = cfg.get_list("list.rules.transform").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, ":");
        assert_eq!(lines[1].text, "l");
        assert_eq!(lines[2].number, 9);
    }

    #[test]
    fn test_duplicate_param_keeps_most_recent() {
        let text = "[s]\nkey = first\nkey = second\n";
        let cfg = Config::parse(text, "test").unwrap();
        assert_eq!(cfg.get_param("s", "key"), Some("second"));
    }

    #[test]
    fn test_missing_param_is_none() {
        let cfg = Config::parse("[s]\nkey = value\n", "test").unwrap();
        assert_eq!(cfg.get_param("s", "nope"), None);
        assert_eq!(cfg.get_int("s", "nope"), -1);
        assert!(!cfg.get_bool("s", "nope"));
    }

    #[test]
    fn test_line_outside_section_is_syntax_error() {
        assert!(Config::parse("key = value\n", "test").is_err());
    }
}
