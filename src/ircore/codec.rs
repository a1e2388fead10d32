//! Front coding for the term dictionary.
//!
//! Terms are diffed against an anchor: the first term, and after that every
//! term whose shared prefix with the current anchor falls below the
//! threshold. Other terms only store their length, the number of leading
//! bytes they share with the anchor, and the bytes after that. The anchor
//! only moves on a new anchor entry.
//!
//! The codec works on whatever order it is given. Sorting first gives
//! better compression but that is the caller's decision.
use serde::{Serialize, Deserialize};
use super::error::CodecError;
use super::TermPos;

const TAG_ANCHOR: u8 = 0;
const TAG_DIFF: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    // full literal, starts a new block
    Anchor { text: String },
    // anchor[..shared] + suffix, len is the byte length of the whole term
    Diff { len: usize, shared: usize, suffix: String },
}

impl Entry {
    pub fn term_len(&self) -> usize {
        match self {
            Entry::Anchor { text } => text.len(),
            Entry::Diff { len, .. } => *len,
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Entry::Anchor { .. })
    }
}

/// Byte length of the longest common prefix, always on a char boundary.
pub fn shared_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(ca, cb)| ca == cb)
        .map(|(ca, _)| ca.len_utf8())
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontCoder {
    min_match: usize,
}

impl FrontCoder {
    pub const DEFAULT_MIN_MATCH: usize = 1;

    pub fn new(min_match: usize) -> Self {
        FrontCoder { min_match }
    }

    pub fn min_match(&self) -> usize {
        self.min_match
    }

    pub fn encode<S: AsRef<str>>(&self, terms: &[S]) -> EncodedDictionary {
        let mut entries = Vec::with_capacity(terms.len());
        let mut anchor: Option<&str> = None;
        for term in terms {
            let term = term.as_ref();
            match anchor {
                Some(current) => {
                    let shared = shared_prefix_len(current, term);
                    if shared >= self.min_match {
                        entries.push(Entry::Diff {
                            len: term.len(),
                            shared,
                            suffix: term[shared..].to_string(),
                        });
                    } else {
                        entries.push(Entry::Anchor { text: term.to_string() });
                        anchor = Some(term);
                    }
                }
                None => {
                    entries.push(Entry::Anchor { text: term.to_string() });
                    anchor = Some(term);
                }
            }
        }
        EncodedDictionary { entries }
    }
}

impl Default for FrontCoder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_MATCH)
    }
}

/// Front-coded term list, entry i is term i of the encoded order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDictionary {
    entries: Vec<Entry>,
}

impl EncodedDictionary {
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        EncodedDictionary { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn anchor_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_anchor()).count()
    }

    pub fn iter(&self) -> Decoder<'_> {
        Decoder {
            entries: self.entries.iter(),
            pos: 0,
            anchor: None,
            failed: false,
        }
    }

    pub fn decode(&self) -> Result<Vec<String>, CodecError> {
        self.iter().collect()
    }

    // Finds the position of term without materializing the whole term list.
    pub fn position(&self, term: &str) -> Result<Option<TermPos>, CodecError> {
        for (pos, decoded) in self.iter().enumerate() {
            if decoded? == term {
                return Ok(Some(pos));
            }
        }
        Ok(None)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_size());
        for entry in &self.entries {
            match entry {
                Entry::Anchor { text } => {
                    buf.push(TAG_ANCHOR);
                    write_varint(&mut buf, text.len());
                    buf.extend_from_slice(text.as_bytes());
                }
                Entry::Diff { len, shared, suffix } => {
                    buf.push(TAG_DIFF);
                    write_varint(&mut buf, *len);
                    write_varint(&mut buf, *shared);
                    buf.extend_from_slice(suffix.as_bytes());
                }
            }
        }
        buf
    }

    /// Parses the framing written by `to_bytes`.
    ///
    /// Only the framing is checked here: every length must fit in the
    /// remaining input. Whether a diff entry agrees with its anchor is
    /// checked when decoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = ByteReader { bytes, offset: 0 };
        let mut entries = vec![];
        while !reader.is_empty() {
            let entry = entries.len();
            let tag = reader.read_u8(entry)?;
            match tag {
                TAG_ANCHOR => {
                    let len = reader.read_varint(entry)?;
                    let text = reader.read_str(entry, len)?;
                    entries.push(Entry::Anchor { text });
                }
                TAG_DIFF => {
                    let len = reader.read_varint(entry)?;
                    let shared = reader.read_varint(entry)?;
                    if shared > len {
                        return Err(CodecError::LengthMismatch { entry, len, shared, suffix: 0 });
                    }
                    let suffix = reader.read_str(entry, len - shared)?;
                    entries.push(Entry::Diff { len, shared, suffix });
                }
                tag => return Err(CodecError::InvalidTag { entry, tag }),
            }
        }
        Ok(EncodedDictionary { entries })
    }

    // size of the byte framing, without building it
    pub fn encoded_size(&self) -> usize {
        self.entries.iter().map(|entry| match entry {
            Entry::Anchor { text } => 1 + varint_len(text.len()) + text.len(),
            Entry::Diff { len, shared, suffix } =>
                1 + varint_len(*len) + varint_len(*shared) + suffix.len(),
        }).sum()
    }
}

/// Streaming decoder, yields terms in encoded order.
///
/// Stops after the first error.
pub struct Decoder<'a> {
    entries: std::slice::Iter<'a, Entry>,
    pos: usize,
    anchor: Option<&'a str>,
    failed: bool,
}

impl<'a> Decoder<'a> {
    fn decode_entry(&mut self, entry: &'a Entry) -> Result<String, CodecError> {
        let pos = self.pos;
        match entry {
            Entry::Anchor { text } => {
                self.anchor = Some(text.as_str());
                Ok(text.clone())
            }
            Entry::Diff { len, shared, suffix } => {
                let anchor = self.anchor.ok_or(CodecError::MissingAnchor { entry: pos })?;
                if *shared > anchor.len() {
                    return Err(CodecError::SharedExceedsAnchor {
                        entry: pos, shared: *shared, anchor: anchor.len(),
                    });
                }
                if *len != shared + suffix.len() {
                    return Err(CodecError::LengthMismatch {
                        entry: pos, len: *len, shared: *shared, suffix: suffix.len(),
                    });
                }
                if !anchor.is_char_boundary(*shared) {
                    return Err(CodecError::SplitCharacter { entry: pos });
                }
                let mut term = String::with_capacity(*len);
                term.push_str(&anchor[..*shared]);
                term.push_str(suffix);
                Ok(term)
            }
        }
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<String, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = self.entries.next()?;
        let res = self.decode_entry(entry);
        self.failed = res.is_err();
        self.pos += 1;
        Some(res)
    }
}

fn write_varint(buf: &mut Vec<u8>, mut value: usize) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn varint_len(mut value: usize) -> usize {
    let mut n = 1;
    while value >= 0x80 {
        value >>= 7;
        n += 1;
    }
    n
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn is_empty(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn read_u8(&mut self, entry: usize) -> Result<u8, CodecError> {
        let byte = *self.bytes.get(self.offset)
            .ok_or(CodecError::Truncated { entry, needed: 1, available: 0 })?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_varint(&mut self, entry: usize) -> Result<usize, CodecError> {
        let mut value = 0usize;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8(entry)?;
            value |= ((byte & 0x7F) as usize) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 35 {
                return Err(CodecError::VarintOverflow { entry });
            }
        }
        Ok(value)
    }

    fn read_str(&mut self, entry: usize, len: usize) -> Result<String, CodecError> {
        if len > self.remaining() {
            return Err(CodecError::Truncated { entry, needed: len, available: self.remaining() });
        }
        let raw = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8 { entry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(len: usize, shared: usize, suffix: &str) -> Entry {
        Entry::Diff { len, shared, suffix: suffix.to_string() }
    }

    fn anchor(text: &str) -> Entry {
        Entry::Anchor { text: text.to_string() }
    }

    #[test]
    fn test_shared_prefix_len() {
        assert_eq!(shared_prefix_len("document", "documentary"), 8);
        assert_eq!(shared_prefix_len("document", "doctor"), 3);
        assert_eq!(shared_prefix_len("first", "the"), 0);
        assert_eq!(shared_prefix_len("", "the"), 0);
        // a later coincidence after a mismatch does not count
        assert_eq!(shared_prefix_len("abcd", "axcd"), 1);
        assert_eq!(shared_prefix_len("xbc", "abc"), 0);
        // never splits a character
        assert_eq!(shared_prefix_len("né", "nè"), 1);
    }

    #[test]
    fn test_encode_document_family() {
        let terms = vec!["document", "documentary", "doctor"];
        let encoded = FrontCoder::default().encode(&terms);
        assert_eq!(encoded.entries(), &[
            anchor("document"),
            diff(11, 8, "ary"),
            diff(6, 3, "tor"),
        ]);
        assert_eq!(encoded.decode().unwrap(), terms);
    }

    #[test]
    fn test_anchor_moves_only_on_mismatch() {
        let terms = vec!["the", "first", "document", "second", "third"];
        let encoded = FrontCoder::default().encode(&terms);
        assert_eq!(encoded.entries(), &[
            anchor("the"),
            anchor("first"),
            anchor("document"),
            anchor("second"),
            anchor("third"),
        ]);
        assert_eq!(encoded.anchor_count(), 5);

        let terms = vec!["car", "cart", "cat", "dog", "door", "cab"];
        let encoded = FrontCoder::default().encode(&terms);
        assert_eq!(encoded.entries(), &[
            anchor("car"),
            diff(4, 3, "t"),
            diff(3, 2, "t"),
            anchor("dog"),
            diff(4, 2, "or"),
            anchor("cab"),
        ]);
        assert_eq!(encoded.decode().unwrap(), terms);
    }

    #[test]
    fn test_min_match_threshold() {
        let terms = vec!["document", "doctor", "dog"];
        let encoded = FrontCoder::new(4).encode(&terms);
        assert_eq!(encoded.entries(), &[anchor("document"), anchor("doctor"), anchor("dog")]);
        let encoded = FrontCoder::new(3).encode(&terms);
        assert_eq!(encoded.entries(), &[anchor("document"), diff(6, 3, "tor"), anchor("dog")]);
        // zero threshold diffs everything against the first term
        let encoded = FrontCoder::new(0).encode(&["abc", "xyz"]);
        assert_eq!(encoded.entries(), &[anchor("abc"), diff(3, 0, "xyz")]);
        assert_eq!(encoded.decode().unwrap(), vec!["abc", "xyz"]);
    }

    #[test]
    fn test_term_prefix_of_anchor() {
        let terms = vec!["documentary", "document", "doc"];
        let encoded = FrontCoder::default().encode(&terms);
        assert_eq!(encoded.entries(), &[anchor("documentary"), diff(8, 8, ""), diff(3, 3, "")]);
        assert_eq!(encoded.decode().unwrap(), terms);
    }

    #[test]
    fn test_round_trip() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["single"],
            vec!["a", "b", "c"],
            vec!["inter", "internal", "internet", "interval", "in", "i", "into", "x"],
            vec!["zebra", "apple", "applesauce", "app", "banana", "band", "bandana"],
            vec!["naïve", "naïvety", "nacht", "über", "übung"],
        ];
        for terms in cases {
            for min_match in 0..4 {
                let encoded = FrontCoder::new(min_match).encode(&terms);
                assert_eq!(encoded.len(), terms.len());
                assert_eq!(encoded.decode().unwrap(), terms);
                let framed = EncodedDictionary::from_bytes(&encoded.to_bytes()).unwrap();
                assert_eq!(framed, encoded);
                assert_eq!(encoded.to_bytes().len(), encoded.encoded_size());
            }
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let terms = vec!["document", "documentary", "doctor", "the"];
        let coder = FrontCoder::default();
        assert_eq!(coder.encode(&terms), coder.encode(&terms));
    }

    #[test]
    fn test_empty() {
        let encoded = FrontCoder::default().encode::<&str>(&[]);
        assert!(encoded.is_empty());
        assert_eq!(encoded.decode().unwrap(), Vec::<String>::new());
        assert!(encoded.to_bytes().is_empty());
        assert_eq!(EncodedDictionary::from_bytes(&[]).unwrap(), encoded);
        assert_eq!(encoded.position("the"), Ok(None));
    }

    #[test]
    fn test_position() {
        let encoded = FrontCoder::default().encode(&["document", "documentary", "doctor", "the"]);
        assert_eq!(encoded.position("document"), Ok(Some(0)));
        assert_eq!(encoded.position("doctor"), Ok(Some(2)));
        assert_eq!(encoded.position("the"), Ok(Some(3)));
        assert_eq!(encoded.position("docto"), Ok(None));
    }

    #[test]
    fn test_delimiters_inside_terms() {
        // no delimiter scanning, so separators and digits inside terms are harmless
        let terms = vec!["a,b", "a,b*c", "a@1", "12", "1"];
        let encoded = FrontCoder::default().encode(&terms);
        let framed = EncodedDictionary::from_bytes(&encoded.to_bytes()).unwrap();
        assert_eq!(framed.decode().unwrap(), terms);
    }

    #[test]
    fn test_corrupted_entries() {
        let encoded = EncodedDictionary::from_entries(vec![diff(3, 0, "abc")]);
        assert_eq!(encoded.decode(), Err(CodecError::MissingAnchor { entry: 0 }));

        let encoded = EncodedDictionary::from_entries(vec![anchor("doc"), diff(6, 4, "to")]);
        assert_eq!(encoded.decode(), Err(CodecError::SharedExceedsAnchor { entry: 1, shared: 4, anchor: 3 }));

        let encoded = EncodedDictionary::from_entries(vec![anchor("document"), diff(7, 3, "tor")]);
        assert_eq!(encoded.decode(), Err(CodecError::LengthMismatch { entry: 1, len: 7, shared: 3, suffix: 3 }));

        let encoded = EncodedDictionary::from_entries(vec![anchor("né"), diff(3, 2, "x")]);
        assert_eq!(encoded.decode(), Err(CodecError::SplitCharacter { entry: 1 }));
    }

    #[test]
    fn test_decoder_stops_after_error() {
        let encoded = EncodedDictionary::from_entries(vec![
            anchor("document"),
            diff(7, 3, "tor"),
            anchor("the"),
        ]);
        let decoded: Vec<Result<String, CodecError>> = encoded.iter().collect();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0], Ok("document".to_string()));
        assert!(decoded[1].is_err());
        assert!(encoded.position("the").is_err());
    }

    #[test]
    fn test_truncated_bytes() {
        let encoded = FrontCoder::default().encode(&["document", "documentary"]);
        let bytes = encoded.to_bytes();
        // tag, len, "document", tag, len, shared, "ary"
        assert_eq!(bytes.len(), 1 + 1 + 8 + 1 + 1 + 1 + 3);
        // cutting right after the anchor leaves a valid, shorter dictionary
        for cut in (1..bytes.len()).filter(|&cut| cut != 10) {
            let err = EncodedDictionary::from_bytes(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, CodecError::Truncated { .. }), "cut at {}: {:?}", cut, err);
        }
        assert_eq!(
            EncodedDictionary::from_bytes(&bytes[..bytes.len() - 1]),
            Err(CodecError::Truncated { entry: 1, needed: 3, available: 2 }),
        );
    }

    #[test]
    fn test_malformed_bytes() {
        assert_eq!(EncodedDictionary::from_bytes(&[7]), Err(CodecError::InvalidTag { entry: 0, tag: 7 }));
        assert_eq!(
            EncodedDictionary::from_bytes(&[TAG_ANCHOR, 1, b'a', TAG_DIFF, 2, 3]),
            Err(CodecError::LengthMismatch { entry: 1, len: 2, shared: 3, suffix: 0 }),
        );
        assert_eq!(
            EncodedDictionary::from_bytes(&[TAG_ANCHOR, 2, 0xC3, 0x28]),
            Err(CodecError::InvalidUtf8 { entry: 0 }),
        );
        assert_eq!(
            EncodedDictionary::from_bytes(&[TAG_ANCHOR, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
            Err(CodecError::VarintOverflow { entry: 0 }),
        );
    }

    #[test]
    fn test_varint() {
        for value in [0usize, 1, 127, 128, 300, 16384, 1 << 28] {
            let mut buf = vec![];
            write_varint(&mut buf, value);
            assert_eq!(buf.len(), varint_len(value));
            let mut reader = ByteReader { bytes: &buf, offset: 0 };
            assert_eq!(reader.read_varint(0), Ok(value));
            assert!(reader.is_empty());
        }
    }
}
