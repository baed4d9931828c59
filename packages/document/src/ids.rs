use crate::node::NodeId;
use crc32fast::Hasher;

/// Generate a stable document id from a file path using CRC32
pub fn document_id(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential node id generator, one per document
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn next_id(&mut self) -> NodeId {
        self.count += 1;
        NodeId(self.count)
    }
}
