use std::collections::{HashMap, HashSet};
use serde::{Serialize, Deserialize};
use super::codec::{EncodedDictionary, FrontCoder};
use super::dictionary::Dictionary;
use super::error::CodecError;
use super::postings::PostingSet;
use super::tokenizer::parse_tokens;
use super::{RecordId, TermPos};

/// Index open for ingestion.
///
/// `seal` consumes the writer and hands out the read-only `InvertedIndex`,
/// so nothing can be ingested once readers exist.
#[derive(Debug, Default)]
pub struct IndexWriter {
    dict: Dictionary,
    // postings[pos] belongs to the term at dict position pos
    postings: Vec<PostingSet>,
    // number of tokens of a record, repeated tokens included
    document_length: HashMap<RecordId, u32>,
    total_document_length: u64,
    last_record_id: RecordId,
}

impl IndexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, record_id: RecordId, text: &str) {
        let tokens = parse_tokens(text);
        let length = tokens.len() as u32;
        *self.document_length.entry(record_id).or_insert(0) += length;
        self.total_document_length += length as u64;
        self.last_record_id = self.last_record_id.max(record_id);
        for token in tokens {
            let pos = self.dict.add(&token);
            if pos == self.postings.len() {
                self.postings.push(PostingSet::new());
            }
            self.postings[pos].insert(record_id);
        }
        debug_assert_eq!(self.dict.len(), self.postings.len());
    }

    // assigns the next record id and ingests the text under it
    pub fn add_document(&mut self, text: &str) -> RecordId {
        let record_id = self.last_record_id + 1;
        self.ingest(record_id, text);
        record_id
    }

    pub fn document_count(&self) -> usize {
        self.document_length.len()
    }

    pub fn term_count(&self) -> usize {
        self.dict.len()
    }

    /// Freezes the index in first-seen term order.
    pub fn seal(self) -> InvertedIndex {
        log::debug!("sealing index: {} records, {} terms", self.document_count(), self.term_count());
        InvertedIndex {
            terms: TermStore::Raw(self.dict),
            postings: self.postings,
            document_length: self.document_length,
            total_document_length: self.total_document_length,
        }
    }

    /// Freezes the index with terms in lexicographic order.
    ///
    /// Terms and posting sets move together. Neighbouring terms then share
    /// longer prefixes, which is what front coding feeds on.
    pub fn seal_sorted(self) -> InvertedIndex {
        let mut pairs: Vec<(String, PostingSet)> = self.dict.into_terms()
            .into_iter()
            .zip(self.postings)
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let (terms, postings): (Vec<String>, Vec<PostingSet>) = pairs.into_iter().unzip();
        let writer = IndexWriter {
            dict: Dictionary::from_terms(terms),
            postings,
            document_length: self.document_length,
            total_document_length: self.total_document_length,
            last_record_id: self.last_record_id,
        };
        writer.seal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum TermStore {
    Raw(Dictionary),
    Compressed(EncodedDictionary),
}

/// Sealed, read-only inverted index.
///
/// Shared references are safe to use from any number of threads. The only
/// mutation left, `compress`, needs `&mut self`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    terms: TermStore,
    postings: Vec<PostingSet>,
    document_length: HashMap<RecordId, u32>,
    total_document_length: u64,
}

pub struct IndexStats {
    pub document_count: usize,
    pub total_document_length: u64,
    pub average_document_length: f32,
    pub term_count: usize,
    pub compressed: bool,
    // bytes of all terms laid end to end
    pub raw_size: usize,
    pub encoded_size: Option<usize>,
    pub anchor_count: Option<usize>,
}

impl InvertedIndex {
    pub fn is_compressed(&self) -> bool {
        matches!(self.terms, TermStore::Compressed(_))
    }

    pub fn compress(&mut self) -> bool {
        self.compress_with(FrontCoder::default())
    }

    // Returns false when the index was already compressed.
    pub fn compress_with(&mut self, coder: FrontCoder) -> bool {
        let encoded = match &self.terms {
            TermStore::Compressed(_) => {
                log::debug!("index already compressed, nothing to do");
                return false;
            }
            TermStore::Raw(dict) => coder.encode(dict.terms()),
        };
        debug_assert_eq!(encoded.len(), self.postings.len());
        log::info!("compressed {} terms ({} anchors) into {} bytes",
            encoded.len(), encoded.anchor_count(), encoded.encoded_size());
        self.terms = TermStore::Compressed(encoded);
        true
    }

    pub fn encoded(&self) -> Option<&EncodedDictionary> {
        match &self.terms {
            TermStore::Raw(_) => None,
            TermStore::Compressed(encoded) => Some(encoded),
        }
    }

    // Ordered term list, whatever the mode.
    pub fn decoded(&self) -> Result<Vec<String>, CodecError> {
        match &self.terms {
            TermStore::Raw(dict) => Ok(dict.terms().to_vec()),
            TermStore::Compressed(encoded) => encoded.decode(),
        }
    }

    pub fn position(&self, term: &str) -> Result<Option<TermPos>, CodecError> {
        match &self.terms {
            TermStore::Raw(dict) => Ok(dict.get(term)),
            TermStore::Compressed(encoded) => encoded.position(term),
        }
    }

    pub fn postings(&self, term: &str) -> Result<Option<&PostingSet>, CodecError> {
        Ok(self.position(term)?.and_then(|pos| self.postings.get(pos)))
    }

    pub fn posting_array(&self) -> &[PostingSet] {
        &self.postings
    }

    // (term, postings) pairs in dictionary order
    pub fn term_postings(&self) -> Result<Vec<(String, &PostingSet)>, CodecError> {
        Ok(self.decoded()?.into_iter().zip(self.postings.iter()).collect())
    }

    /// Records containing every token of the query.
    ///
    /// A token missing from the dictionary empties the result, as does a
    /// query without any token.
    pub fn search(&self, query: &str) -> Result<HashSet<RecordId>, CodecError> {
        let mut result: Option<HashSet<RecordId>> = None;
        for token in parse_tokens(query) {
            let postings = match self.postings(&token)? {
                Some(postings) => postings,
                None => return Ok(HashSet::new()),
            };
            let narrowed = match result {
                None => postings.to_set(),
                Some(mut acc) => {
                    let members = postings.as_set();
                    acc.retain(|id| members.contains(id));
                    acc
                }
            };
            if narrowed.is_empty() {
                return Ok(narrowed);
            }
            result = Some(narrowed);
        }
        Ok(result.unwrap_or_default())
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn document_frequency(&self, term: &str) -> Result<usize, CodecError> {
        Ok(self.postings(term)?.map_or(0, |p| p.len()))
    }

    pub fn document_count(&self) -> usize {
        self.document_length.len()
    }

    pub fn document_length(&self, record_id: RecordId) -> Option<u32> {
        self.document_length.get(&record_id).copied()
    }

    pub fn total_document_length(&self) -> u64 {
        self.total_document_length
    }

    pub fn average_document_length(&self) -> f32 {
        if self.document_length.is_empty() {
            return 0.0;
        }
        self.total_document_length as f32 / self.document_count() as f32
    }

    pub fn stats(&self) -> IndexStats {
        let (raw_size, encoded_size, anchor_count) = match &self.terms {
            TermStore::Raw(dict) => (dict.raw_size(), None, None),
            TermStore::Compressed(encoded) => (
                encoded.entries().iter().map(|e| e.term_len()).sum(),
                Some(encoded.encoded_size()),
                Some(encoded.anchor_count()),
            ),
        };
        IndexStats {
            document_count: self.document_count(),
            total_document_length: self.total_document_length,
            average_document_length: self.average_document_length(),
            term_count: self.term_count(),
            compressed: self.is_compressed(),
            raw_size,
            encoded_size,
            anchor_count,
        }
    }
}
