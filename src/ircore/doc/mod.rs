pub mod text;

use super::RecordId;

#[derive(PartialEq, Debug)]
pub struct Document {
    record_id: RecordId,
    content: String,
}

impl Document {
    pub fn new(record_id: RecordId, content: String) -> Self {
        Document {
            record_id,
            content,
        }
    }
    pub fn get_record_id(&self) -> RecordId {
        self.record_id
    }
    pub fn get_content(&self) -> &str {
        &self.content
    }
}
