//! Block and page layout records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Block identifier, stable across edits
pub type BlockId = String;

/// Open key/value payload whose shape depends on the block type
pub type Settings = Map<String, Value>;

/// Closed set of block types the storefront knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Header,
    Hero,
    RichText,
    ProductGrid,
    FeaturedProduct,
    CategoryList,
    Gallery,
    ImageWithText,
    Testimonials,
    Newsletter,
    Faq,
    Video,
    Banner,
    Features,
    Countdown,
    LogoCloud,
    Contact,
    Section,
    Columns,
    Footer,
}

impl BlockType {
    pub const ALL: [BlockType; 20] = [
        BlockType::Header,
        BlockType::Hero,
        BlockType::RichText,
        BlockType::ProductGrid,
        BlockType::FeaturedProduct,
        BlockType::CategoryList,
        BlockType::Gallery,
        BlockType::ImageWithText,
        BlockType::Testimonials,
        BlockType::Newsletter,
        BlockType::Faq,
        BlockType::Video,
        BlockType::Banner,
        BlockType::Features,
        BlockType::Countdown,
        BlockType::LogoCloud,
        BlockType::Contact,
        BlockType::Section,
        BlockType::Columns,
        BlockType::Footer,
    ];

    /// Wire tag (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Hero => "hero",
            BlockType::RichText => "rich-text",
            BlockType::ProductGrid => "product-grid",
            BlockType::FeaturedProduct => "featured-product",
            BlockType::CategoryList => "category-list",
            BlockType::Gallery => "gallery",
            BlockType::ImageWithText => "image-with-text",
            BlockType::Testimonials => "testimonials",
            BlockType::Newsletter => "newsletter",
            BlockType::Faq => "faq",
            BlockType::Video => "video",
            BlockType::Banner => "banner",
            BlockType::Features => "features",
            BlockType::Countdown => "countdown",
            BlockType::LogoCloud => "logo-cloud",
            BlockType::Contact => "contact",
            BlockType::Section => "section",
            BlockType::Columns => "columns",
            BlockType::Footer => "footer",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

/// Type tag as stored on a block.
///
/// Layouts written by a newer editor may carry types this build does not know.
/// Those survive a load/save cycle as `Unknown` and render nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Known(BlockType),
    Unknown(String),
}

impl BlockKind {
    pub fn known(&self) -> Option<BlockType> {
        match self {
            BlockKind::Known(t) => Some(*t),
            BlockKind::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Known(t) => t.as_str(),
            BlockKind::Unknown(name) => name,
        }
    }
}

impl From<String> for BlockKind {
    fn from(s: String) -> Self {
        match s.parse::<BlockType>() {
            Ok(t) => BlockKind::Known(t),
            Err(_) => BlockKind::Unknown(s),
        }
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Known(t) => t.as_str().to_string(),
            BlockKind::Unknown(name) => name,
        }
    }
}

impl From<BlockType> for BlockKind {
    fn from(t: BlockType) -> Self {
        BlockKind::Known(t)
    }
}

fn default_visible() -> bool {
    true
}

/// A node in a page's content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    /// Presentation sub-mode; `None` means the registry default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Position among siblings; gaps allowed, ties keep collection order
    #[serde(default)]
    pub order: i64,

    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Container this block is nested under (`None` = page root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BlockId>,

    #[serde(default)]
    pub settings: Settings,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            kind: BlockKind::Known(block_type),
            variant: None,
            order: 0,
            visible: true,
            parent_id: None,
            settings: Settings::new(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<BlockId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.kind.known()
    }

    /// Variant to render with, or `None` when the type or variant is not legal
    pub fn effective_variant(&self) -> Option<&str> {
        let block_type = self.block_type()?;
        let meta = crate::registry::block_meta(block_type);

        match &self.variant {
            Some(v) => meta.variants.iter().copied().find(|legal| *legal == v.as_str()),
            None => meta.variants.first().copied(),
        }
    }

    /// String setting, treating missing and non-string values as absent
    pub fn text(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
}

/// The block collection composing one page plus page-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub slug: String,

    #[serde(default)]
    pub is_homepage: bool,

    #[serde(default)]
    pub status: PublishStatus,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl PageLayout {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            is_homepage: false,
            status: PublishStatus::Draft,
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn find_block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_block(id).is_some()
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_round_trips_through_tag() {
        for t in BlockType::ALL {
            assert_eq!(t.as_str().parse::<BlockType>(), Ok(t));
        }
    }

    #[test]
    fn test_unknown_type_survives_deserialization() {
        let json = r#"{"id":"b1","type":"3d-viewer","order":1}"#;
        let block: Block = serde_json::from_str(json).unwrap();

        assert_eq!(block.kind, BlockKind::Unknown("3d-viewer".to_string()));
        assert!(block.visible);
        assert_eq!(block.effective_variant(), None);

        let out = serde_json::to_value(&block).unwrap();
        assert_eq!(out["type"], "3d-viewer");
    }

    #[test]
    fn test_effective_variant() {
        let block = Block::new("h", BlockType::Hero);
        assert_eq!(block.effective_variant(), Some("centered"));

        let block = Block::new("h", BlockType::Hero).with_variant("split");
        assert_eq!(block.effective_variant(), Some("split"));

        let block = Block::new("h", BlockType::Hero).with_variant("spinning");
        assert_eq!(block.effective_variant(), None);
    }

    #[test]
    fn test_layout_json_defaults() {
        let json = r#"{
            "slug": "home",
            "isHomepage": true,
            "blocks": [
                {"id": "a", "type": "hero", "order": 2, "settings": {"title": "Hi"}},
                {"id": "b", "type": "footer", "visible": false}
            ]
        }"#;

        let layout = PageLayout::from_json(json).unwrap();
        assert_eq!(layout.status, PublishStatus::Draft);
        assert!(layout.is_homepage);
        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.find_block("a").unwrap().text("title"), Some("Hi"));
        assert!(!layout.find_block("b").unwrap().visible);
    }
}
