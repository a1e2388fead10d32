use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::ircore::cfg::Cfg;
use crate::ircore::doc::Document;
use crate::ircore::doc::text;
use crate::ircore::error::Result;
use crate::ircore::index::{IndexWriter, InvertedIndex, IndexStats};
use crate::ircore::RecordId;

/// Index plus the config it was built with, persisted together so a later
/// `compress` uses the build-time `min_match`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Engine {
    index: InvertedIndex,
    cfg: Cfg,
}

impl Engine {
    pub fn build_from(path: &Path, cfg: &Cfg) -> Result<Self> {
        let docs = text::read_lines(path)?;
        if docs.is_empty() {
            log::warn!("corpus {} contains no records, index is empty", path.display());
        }
        log::info!("indexing {} records from {}", docs.len(), path.display());
        Ok(Self::from_documents(docs, cfg))
    }

    pub fn from_documents<I: IntoIterator<Item = Document>>(docs: I, cfg: &Cfg) -> Self {
        let mut writer = IndexWriter::new();
        for (n, doc) in docs.into_iter().enumerate() {
            writer.ingest(doc.get_record_id(), doc.get_content());
            if (n + 1) % 1000 == 0 {
                log::debug!("{} records ingested", n + 1);
            }
        }
        let index = if cfg.sort_terms() {
            writer.seal_sorted()
        } else {
            writer.seal()
        };
        let mut engine = Engine { index, cfg: cfg.clone() };
        if cfg.compress() {
            engine.compress();
        }
        engine
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut reader = File::open(path)?;
        let mut encoded: Vec<u8> = vec![];
        reader.read_to_end(&mut encoded)?;
        let engine: Engine = bincode::deserialize(&encoded[..])?;
        log::debug!("loaded index of {} records from {}", engine.doc_count(), path.display());
        Ok(engine)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let encoded: Vec<u8> = bincode::serialize(self)?;
        let mut writer = File::create(path)?;
        writer.write_all(&encoded)?;
        Ok(())
    }

    // false when the dictionary was already compressed
    pub fn compress(&mut self) -> bool {
        self.index.compress_with(self.cfg.coder())
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    pub fn set_cfg(&mut self, cfg: Cfg) {
        self.cfg = cfg;
    }

    pub fn doc_count(&self) -> usize {
        self.index.document_count()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    // matching record ids, ascending
    pub fn search(&self, query: &str) -> Result<Vec<RecordId>> {
        let mut records: Vec<RecordId> = self.index.search(query)?.into_iter().collect();
        records.sort_unstable();
        Ok(records)
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}
