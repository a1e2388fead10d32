use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use super::TermPos;

/// Distinct terms in first-seen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    term_pos: HashMap<String, TermPos>,
    terms: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            term_pos: HashMap::new(),
            terms: vec![],
        }
    }

    // position of the term, the term is appended on first sight
    pub fn add(&mut self, word: &str) -> TermPos {
        if let Some(&pos) = self.term_pos.get(word) {
            return pos;
        }
        let pos = self.terms.len();
        self.terms.push(word.to_owned());
        self.term_pos.insert(word.to_owned(), pos);
        pos
    }

    pub fn get(&self, word: &str) -> Option<TermPos> {
        self.term_pos.get(word).copied()
    }

    pub fn get_term(&self, pos: TermPos) -> Option<&str> {
        self.terms.get(pos).map(|t| t.as_str())
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn into_terms(self) -> Vec<String> {
        self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    // Byte size of all terms, what a plain concatenation would cost.
    pub fn raw_size(&self) -> usize {
        self.terms.iter().map(|t| t.len()).sum()
    }

    /// Rebuilds the dictionary from an already ordered, duplicate free list.
    pub fn from_terms(terms: Vec<String>) -> Self {
        let term_pos = terms.iter()
            .enumerate()
            .map(|(pos, term)| (term.clone(), pos))
            .collect();
        Dictionary { term_pos, terms }
    }
}
