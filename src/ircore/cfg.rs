use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use super::codec::FrontCoder;
use super::error::Result;
use super::CFG_NAME;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct Cfg {
    // shortest shared prefix worth a diff entry
    min_match: usize,
    // sort the dictionary before front coding
    sort_terms: bool,
    // compress right after building
    compress: bool,
}

impl Default for Cfg {
    fn default() -> Self {
        Cfg {
            min_match: FrontCoder::DEFAULT_MIN_MATCH,
            sort_terms: false,
            compress: false,
        }
    }
}

impl Cfg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(cfg_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(cfg_str)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg_str = fs::read_to_string(path)?;
        Self::from_str(&cfg_str)
    }

    // .circfg next to the corpus file, defaults when there is none
    pub fn for_corpus(corpus: &Path) -> Result<Self> {
        let cfg_path = match corpus.parent() {
            Some(dir) => dir.join(CFG_NAME),
            None => Path::new(CFG_NAME).to_path_buf(),
        };
        if cfg_path.is_file() {
            log::debug!("loading config {}", cfg_path.display());
            return Self::load_from(&cfg_path);
        }
        Ok(Self::default())
    }

    pub fn coder(&self) -> FrontCoder {
        FrontCoder::new(self.min_match)
    }

    pub fn sort_terms(&self) -> bool {
        self.sort_terms
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn set_compress(&mut self, compress: bool) {
        self.compress = compress;
    }
}
