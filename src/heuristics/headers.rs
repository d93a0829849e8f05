use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DEFAULT_CLASSIFIER: Lazy<HeaderClassifier> = Lazy::new(|| {
    HeaderClassifier::new(&HeaderRules::default()).expect("default header rules compile")
});

/// Tunable rules deciding which colon-terminated lines are headers
///
/// Every field has a default tuned for Knesset committee protocols, so a rules
/// file only needs to name the fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderRules {
    /// Longest line (in characters) that may be a colon-terminated header
    pub max_header_chars: usize,
    /// Lines starting with one of these are speech, not headers
    pub first_person_prefixes: Vec<String>,
    /// Words that, directly before the final colon, introduce a list
    pub list_connectives: Vec<String>,
    /// Reject lines containing a single character in parentheses, e.g. "(א)"
    pub exclude_letter_parenthetical: bool,
    /// Reject lines containing a number in parentheses, e.g. "(12)"
    pub exclude_numeric_parenthetical: bool,
    /// Reject lines containing a numbered-list marker, e.g. "3."
    pub exclude_numbered_items: bool,
    /// Additional regular expressions; a match rejects the line
    pub extra_exclusions: Vec<String>,
}

impl Default for HeaderRules {
    fn default() -> Self {
        Self {
            max_header_chars: 50,
            first_person_prefixes: vec!["אני ".to_string()],
            list_connectives: [
                "אלה", "אלו", "יבוא", "מאלה", "ייאמר", "אומר", "אומרת", "נאמר", "כך", "הבאים",
                "הבאות",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            exclude_letter_parenthetical: true,
            exclude_numeric_parenthetical: true,
            exclude_numbered_items: true,
            extra_exclusions: Vec::new(),
        }
    }
}

impl HeaderRules {
    /// Build the combined not-header pattern, or None when nothing is excluded
    fn exclusion_pattern(&self) -> Option<String> {
        let mut alternatives = Vec::new();

        let prefixes = escaped_alternation(&self.first_person_prefixes);
        if let Some(prefixes) = prefixes {
            alternatives.push(format!("^(?:{})", prefixes));
        }

        if let Some(connectives) = escaped_alternation(&self.list_connectives) {
            alternatives.push(format!("(?:{}):$", connectives));
        }

        if self.exclude_letter_parenthetical {
            alternatives.push(r"\(.\)".to_string());
        }
        if self.exclude_numeric_parenthetical {
            alternatives.push(r"\(\d+\)".to_string());
        }
        if self.exclude_numbered_items {
            alternatives.push(r"\d\.".to_string());
        }

        alternatives.extend(
            self.extra_exclusions
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| format!("(?:{})", p)),
        );

        if alternatives.is_empty() {
            None
        } else {
            Some(alternatives.join("|"))
        }
    }
}

fn escaped_alternation(words: &[String]) -> Option<String> {
    let escaped: Vec<String> = words
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(w))
        .collect();
    if escaped.is_empty() {
        None
    } else {
        Some(escaped.join("|"))
    }
}

/// Compiled form of [`HeaderRules`]
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    max_header_chars: usize,
    not_header: Option<Regex>,
}

impl HeaderClassifier {
    /// Compile the rules; fails only if an extra exclusion is not a valid regex
    pub fn new(rules: &HeaderRules) -> Result<Self, regex::Error> {
        let not_header = rules
            .exclusion_pattern()
            .map(|p| Regex::new(&p))
            .transpose()?;
        Ok(Self {
            max_header_chars: rules.max_header_chars,
            not_header,
        })
    }

    /// Returns true if `line` looks like it should start a new protocol part
    ///
    /// The length limit counts the whole line, indentation and padding included.
    pub fn is_header(&self, line: &str) -> bool {
        let raw = line.trim_end_matches(['\r', '\n']);
        let line = raw.trim();
        if line.is_empty() {
            return false;
        }
        if is_angle_header(line) {
            return true;
        }
        line.ends_with(':')
            && raw.chars().count() <= self.max_header_chars
            && !self.is_excluded(line)
    }

    /// Whether the line matches the not-header pattern
    pub fn is_excluded(&self, line: &str) -> bool {
        self.not_header
            .as_ref()
            .is_some_and(|re| re.is_match(line.trim()))
    }
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

/// A `<...>` line, e.g. "<פתיחת הישיבה>"
fn is_angle_header(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('<') && trimmed.ends_with('>')
}

/// Classify a line with the default rules
pub fn legitimate_header(line: &str) -> bool {
    DEFAULT_CLASSIFIER.is_header(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_lines_are_headers() {
        assert!(legitimate_header("<פתיחה>"));
        assert!(legitimate_header("<פתיחה>   "));
        assert!(legitimate_header("  <הצעת חוק לתיקון פקודת התעבורה (תיקון מס' 12), התשע\"ה-2015>"));
        assert!(!legitimate_header("<פתיחה> ועוד"));
    }

    #[test]
    fn test_short_colon_lines_are_headers() {
        assert!(legitimate_header("דובר ראשון:"));
        assert!(legitimate_header("היו\"ר ראובן כהן:  "));
        assert!(!legitimate_header("דובר ראשון: טקסט לדוגמה"));
        assert!(!legitimate_header(""));
        assert!(!legitimate_header("   "));
    }

    #[test]
    fn test_long_colon_lines_are_not_headers() {
        let line = format!("{}:", "א".repeat(50));
        assert_eq!(line.chars().count(), 51);
        assert!(!legitimate_header(&line));

        let line = format!("{}:", "א".repeat(49));
        assert!(legitimate_header(&line));
        assert!(legitimate_header(&format!("{line}\r\n")));
    }

    #[test]
    fn test_length_counts_surrounding_whitespace() {
        let indented = format!("    {}:", "א".repeat(48));
        assert_eq!(indented.chars().count(), 53);
        assert!(!legitimate_header(&indented));

        let padded = format!("דובר:{}", " ".repeat(60));
        assert!(!legitimate_header(&padded));

        assert!(legitimate_header(&format!("  דובר:{}", " ".repeat(10))));
    }

    #[test]
    fn test_exclusions() {
        // list introductions
        assert!(!legitimate_header("בסעיף 2 יבוא:"));
        assert!(!legitimate_header("ואלה הם השינויים שאלה:"));
        assert!(!legitimate_header("הנושאים הבאים:"));
        // first person
        assert!(!legitimate_header("אני רוצה לומר:"));
        // footnote-style parentheticals and numbered items
        assert!(!legitimate_header("סעיף (א):"));
        assert!(!legitimate_header("סעיף (12):"));
        assert!(!legitimate_header("1. הנושא:"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = HeaderRules {
            list_connectives: vec!["following".to_string()],
            first_person_prefixes: vec![],
            extra_exclusions: vec![r"^Note\b".to_string()],
            max_header_chars: 20,
            ..Default::default()
        };
        let classifier = HeaderClassifier::new(&rules).unwrap();

        assert!(classifier.is_header("CHAIR:"));
        assert!(!classifier.is_header("the following:"));
        assert!(!classifier.is_header("Note to self:"));
        assert!(classifier.is_header("אני:"));
        assert!(!classifier.is_header("a very long speaker name:"));
    }

    #[test]
    fn test_no_exclusions_at_all() {
        let rules = HeaderRules {
            first_person_prefixes: vec![],
            list_connectives: vec![],
            exclude_letter_parenthetical: false,
            exclude_numeric_parenthetical: false,
            exclude_numbered_items: false,
            ..Default::default()
        };
        let classifier = HeaderClassifier::new(&rules).unwrap();
        assert!(classifier.is_header("1. הנושאים הבאים:"));
    }

    #[test]
    fn test_invalid_extra_exclusion() {
        let rules = HeaderRules {
            extra_exclusions: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        assert!(HeaderClassifier::new(&rules).is_err());
    }

    #[test]
    fn test_partial_rules_json() {
        let rules: HeaderRules = serde_json::from_str(r#"{"max_header_chars": 30}"#).unwrap();
        assert_eq!(rules.max_header_chars, 30);
        assert_eq!(rules.list_connectives, HeaderRules::default().list_connectives);
    }
}
