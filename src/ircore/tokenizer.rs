// Splits on every run of non [a-zA-Z] characters and lowercases the pieces.
// Empty pieces never leave this module.
pub fn parse_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .map(normalize)
        .collect()
}

pub fn normalize(word: &str) -> String {
    word.to_ascii_lowercase()
}
