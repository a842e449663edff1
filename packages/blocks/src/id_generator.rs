use crate::block::{BlockId, PageLayout};
use crc32fast::Hasher;

/// Generate a page seed from its slug using CRC32
pub fn get_page_seed(slug: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(format!("page://{}", slug).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks created while editing a page
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn for_page(slug: &str) -> Self {
        Self {
            seed: get_page_seed(slug),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> BlockId {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Next ID not already taken by a block in `layout`
    pub fn next_unused(&mut self, layout: &PageLayout) -> BlockId {
        loop {
            let id = self.new_id();
            if !layout.contains(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
