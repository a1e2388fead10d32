//! Inverted index with a front-coded term dictionary.
//!
//! Records are ingested through `IndexWriter`, sealed into a read-only
//! `InvertedIndex`, and optionally compressed. Boolean AND search gives the
//! same answers in both modes.
pub mod ircore;

pub use ircore::codec::{EncodedDictionary, Entry, FrontCoder};
pub use ircore::error::{CodecError, IndexError};
pub use ircore::index::{IndexWriter, InvertedIndex};
pub use ircore::postings::PostingSet;
pub use ircore::RecordId;
