use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use encoding_rs::ISO_8859_2;
use encoding_rs_io::DecodeReaderBytesBuilder;
use super::Document;
use crate::ircore::RecordId;

/// One document per line, record ids counted from 1.
///
/// Blank lines still take an id so that ids match line numbers.
pub fn read_lines(path: &Path) -> io::Result<Vec<Document>> {
    let content = read_to_string(path)?;
    let docs = content.lines()
        .enumerate()
        .map(|(n, line)| Document::new(n as RecordId + 1, line.to_string()))
        .collect();
    Ok(docs)
}

pub fn read_to_string(path: &Path) -> io::Result<String> {
    let path_string = path.to_string_lossy().to_string();
    if !path.is_file() {
        return Err(io::Error::new(ErrorKind::NotFound, format!("{} is not a file", path_string)));
    }
    match fs::read_to_string(path) {
        Ok(c) => Ok(c),
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            log::warn!("{} is not utf-8, decoding as ISO-8859-2", path_string);
            read_to_string_non_utf8_encoding(path)
        }
        Err(e) => Err(e),
    }
}

fn read_to_string_non_utf8_encoding(path: &Path) -> io::Result<String> {
    let source_file = File::open(path)?;
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(ISO_8859_2))
        .build(source_file);
    let mut dest = String::new();
    decoder.read_to_string(&mut dest)?;
    Ok(dest)
}
