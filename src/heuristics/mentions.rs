/// Drop punctuation and spacing that differ between sources of the same text
pub fn search_string(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '”' | '–' | '(' | ')' | ' ' | ',' | '-' | '\n' | '\r'))
        .collect()
}

/// Whether `phrase` appears in `protocol` once both are normalized
///
/// Used to link votes and bills to the meetings that discussed them.
pub fn mentions(protocol: &str, phrase: &str) -> bool {
    let phrase = search_string(phrase);
    !phrase.is_empty() && search_string(protocol).contains(&phrase)
}

/// Subject of a vote title such as "הצבעה מס' 3 - הצעת חוק הגנת הצרכן"
pub fn vote_subject(title: &str) -> &str {
    match title.find(" - ") {
        Some(idx) => title[idx + 3..].trim(),
        None => title.trim(),
    }
}
