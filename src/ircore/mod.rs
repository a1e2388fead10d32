pub mod error;
pub mod tokenizer;
pub mod postings;
pub mod dictionary;
pub mod codec;
pub mod index;
pub mod cfg;
pub mod doc;
pub mod engine;

// record ids are 1-based, 0 is never assigned
pub type RecordId = u32;
// position of a term in the dictionary order, 0-based
pub type TermPos = usize;

pub const CFG_NAME: &str = ".circfg";
