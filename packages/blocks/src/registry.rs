//! # Block Registry
//!
//! Static metadata for every block type: display name, icon, category,
//! legal variants, default settings and nesting rules.
//!
//! The registry is built once on first access and never mutated afterwards.
//!
//! ## Nesting
//!
//! A child may be placed under a parent only when both sides consent:
//! - the parent is a container
//! - the parent declares no `allowed_children`, or lists the child
//! - the child declares no `allowed_parents`, or lists the parent
//!
//! An empty `allowed_parents` list means "page root only".

use crate::block::{BlockType, Settings};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Navigation,
    Hero,
    Content,
    Commerce,
    Media,
    Marketing,
    Layout,
}

impl BlockCategory {
    pub const ALL: [BlockCategory; 7] = [
        BlockCategory::Navigation,
        BlockCategory::Hero,
        BlockCategory::Content,
        BlockCategory::Commerce,
        BlockCategory::Media,
        BlockCategory::Marketing,
        BlockCategory::Layout,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockCategory::Navigation => "navigation",
            BlockCategory::Hero => "hero",
            BlockCategory::Content => "content",
            BlockCategory::Commerce => "commerce",
            BlockCategory::Media => "media",
            BlockCategory::Marketing => "marketing",
            BlockCategory::Layout => "layout",
        }
    }
}

/// Registry entry, one per block type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeta {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub name: &'static str,
    pub icon: &'static str,
    pub category: BlockCategory,
    pub is_container: bool,
    pub allowed_children: Option<&'static [BlockType]>,
    pub allowed_parents: Option<&'static [BlockType]>,
    pub variants: &'static [&'static str],
    pub default_settings: Settings,
}

impl BlockMeta {
    pub fn default_variant(&self) -> &'static str {
        self.variants.first().copied().unwrap_or("default")
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.contains(&variant)
    }

    /// Symmetric whitelist check for placing `child` under `self`
    pub fn accepts_child(&self, child: &BlockMeta) -> bool {
        if !self.is_container {
            return false;
        }

        let parent_consents = self
            .allowed_children
            .map_or(true, |list| list.contains(&child.block_type));

        let child_consents = child
            .allowed_parents
            .map_or(true, |list| list.contains(&self.block_type));

        parent_consents && child_consents
    }
}

const ROOT_ONLY: &[BlockType] = &[];
const SECTION_ONLY: &[BlockType] = &[BlockType::Section];
const COLUMN_CHILDREN: &[BlockType] = &[
    BlockType::RichText,
    BlockType::ImageWithText,
    BlockType::Video,
    BlockType::Gallery,
    BlockType::Features,
    BlockType::Contact,
];

struct Entry {
    name: &'static str,
    icon: &'static str,
    category: BlockCategory,
    is_container: bool,
    allowed_children: Option<&'static [BlockType]>,
    allowed_parents: Option<&'static [BlockType]>,
    variants: &'static [&'static str],
    defaults: Value,
}

impl Entry {
    fn leaf(
        name: &'static str,
        icon: &'static str,
        category: BlockCategory,
        variants: &'static [&'static str],
        defaults: Value,
    ) -> Self {
        Self {
            name,
            icon,
            category,
            is_container: false,
            allowed_children: None,
            allowed_parents: None,
            variants,
            defaults,
        }
    }

    fn parents(mut self, parents: &'static [BlockType]) -> Self {
        self.allowed_parents = Some(parents);
        self
    }

    fn container(mut self, children: Option<&'static [BlockType]>) -> Self {
        self.is_container = true;
        self.allowed_children = children;
        self
    }
}

fn entry_for(block_type: BlockType) -> Entry {
    use BlockCategory::*;

    match block_type {
        BlockType::Header => Entry::leaf(
            "Header",
            "menu",
            Navigation,
            &["classic", "centered", "minimal"],
            json!({ "storeName": "", "links": [], "showCart": true }),
        )
        .parents(ROOT_ONLY),
        BlockType::Hero => Entry::leaf(
            "Hero",
            "image",
            Hero,
            &["centered", "split", "image-background"],
            json!({
                "title": "Welcome to our store",
                "subtitle": "",
                "buttonText": "Shop now",
                "buttonLink": "/products",
                "imageUrl": ""
            }),
        ),
        BlockType::RichText => Entry::leaf(
            "Rich Text",
            "type",
            Content,
            &["default", "narrow", "wide"],
            json!({ "content": "" }),
        ),
        BlockType::ProductGrid => Entry::leaf(
            "Product Grid",
            "grid",
            Commerce,
            &["grid", "carousel", "list"],
            json!({ "title": "Featured products", "limit": 8, "columns": 4 }),
        ),
        BlockType::FeaturedProduct => Entry::leaf(
            "Featured Product",
            "star",
            Commerce,
            &["default", "reversed"],
            json!({ "productId": null, "buttonText": "Add to cart" }),
        ),
        BlockType::CategoryList => Entry::leaf(
            "Category List",
            "folder",
            Commerce,
            &["grid", "list"],
            json!({ "title": "Shop by category", "categories": [] }),
        ),
        BlockType::Gallery => Entry::leaf(
            "Gallery",
            "images",
            Media,
            &["grid", "masonry", "slider"],
            json!({ "title": "", "images": [] }),
        )
        .parents(SECTION_ONLY),
        BlockType::ImageWithText => Entry::leaf(
            "Image with Text",
            "layout",
            Content,
            &["image-left", "image-right"],
            json!({ "title": "", "text": "", "imageUrl": "" }),
        ),
        BlockType::Testimonials => Entry::leaf(
            "Testimonials",
            "quote",
            Marketing,
            &["cards", "slider"],
            json!({ "title": "What our customers say", "items": [] }),
        ),
        BlockType::Newsletter => Entry::leaf(
            "Newsletter",
            "mail",
            Marketing,
            &["inline", "card"],
            json!({
                "title": "Subscribe",
                "description": "",
                "buttonText": "Subscribe",
                "placeholder": "Enter your email"
            }),
        )
        .parents(SECTION_ONLY),
        BlockType::Faq => Entry::leaf(
            "FAQ",
            "help-circle",
            Content,
            &["accordion", "list"],
            json!({ "title": "Frequently asked questions", "items": [] }),
        ),
        BlockType::Video => Entry::leaf(
            "Video",
            "video",
            Media,
            &["default", "full-width"],
            json!({ "title": "", "url": "" }),
        ),
        BlockType::Banner => Entry::leaf(
            "Banner",
            "flag",
            Marketing,
            &["info", "promo"],
            json!({ "text": "", "link": "" }),
        ),
        BlockType::Features => Entry::leaf(
            "Features",
            "list",
            Content,
            &["grid", "list"],
            json!({ "title": "", "items": [] }),
        ),
        BlockType::Countdown => Entry::leaf(
            "Countdown",
            "clock",
            Marketing,
            &["default", "compact"],
            json!({ "title": "", "endsAt": null }),
        ),
        BlockType::LogoCloud => Entry::leaf(
            "Logo Cloud",
            "award",
            Media,
            &["grid", "marquee"],
            json!({ "title": "", "logos": [] }),
        ),
        BlockType::Contact => Entry::leaf(
            "Contact",
            "phone",
            Content,
            &["default", "split"],
            json!({ "title": "Contact us", "email": "", "phone": "", "address": "" }),
        ),
        BlockType::Section => Entry::leaf(
            "Section",
            "square",
            Layout,
            &["default", "boxed", "full-width"],
            json!({ "background": "", "padding": "medium" }),
        )
        .container(None)
        .parents(ROOT_ONLY),
        BlockType::Columns => Entry::leaf(
            "Columns",
            "columns",
            Layout,
            &["two", "three", "four"],
            json!({ "gap": "medium" }),
        )
        .container(Some(COLUMN_CHILDREN))
        .parents(SECTION_ONLY),
        BlockType::Footer => Entry::leaf(
            "Footer",
            "align-bottom",
            Navigation,
            &["simple", "columns"],
            json!({ "copyright": "", "links": [] }),
        )
        .parents(ROOT_ONLY),
    }
}

fn build_registry() -> Vec<BlockMeta> {
    BlockType::ALL
        .iter()
        .map(|&block_type| {
            let entry = entry_for(block_type);
            let default_settings = match entry.defaults {
                Value::Object(map) => map,
                _ => Settings::new(),
            };

            BlockMeta {
                block_type,
                name: entry.name,
                icon: entry.icon,
                category: entry.category,
                is_container: entry.is_container,
                allowed_children: entry.allowed_children,
                allowed_parents: entry.allowed_parents,
                variants: entry.variants,
                default_settings,
            }
        })
        .collect()
}

fn registry() -> &'static [BlockMeta] {
    static REGISTRY: OnceLock<Vec<BlockMeta>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

/// Metadata for a known block type
pub(crate) fn block_meta(block_type: BlockType) -> &'static BlockMeta {
    // Registry is built in `BlockType::ALL` order, which is declaration order
    &registry()[block_type as usize]
}

impl BlockType {
    pub fn meta(&self) -> &'static BlockMeta {
        block_meta(*self)
    }
}

/// Every registry entry, in declaration order
pub fn all_block_meta() -> &'static [BlockMeta] {
    registry()
}

pub fn blocks_in_category(category: BlockCategory) -> Vec<&'static BlockMeta> {
    registry().iter().filter(|m| m.category == category).collect()
}

/// Look up metadata by wire tag; `None` for unknown types
pub fn get_block_meta(type_name: &str) -> Option<&'static BlockMeta> {
    type_name.parse::<BlockType>().ok().map(block_meta)
}

/// Whether `child_type` may be nested under `parent_type`.
///
/// Unknown types on either side yield `false`.
pub fn can_block_be_child_of(child_type: &str, parent_type: &str) -> bool {
    match (get_block_meta(child_type), get_block_meta(parent_type)) {
        (Some(child), Some(parent)) => parent.accepts_child(child),
        _ => false,
    }
}

pub fn get_default_variant(type_name: &str) -> Option<&'static str> {
    get_block_meta(type_name).map(BlockMeta::default_variant)
}

pub fn is_valid_variant(type_name: &str, variant: &str) -> bool {
    get_block_meta(type_name).is_some_and(|m| m.has_variant(variant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_indexed_by_declaration_order() {
        for (i, t) in BlockType::ALL.iter().enumerate() {
            assert_eq!(all_block_meta()[i].block_type, *t);
            assert_eq!(t.meta().block_type, *t);
        }
    }

    #[test]
    fn test_every_type_has_variants_and_object_defaults() {
        for meta in all_block_meta() {
            assert!(!meta.variants.is_empty(), "{} has no variants", meta.name);
            assert_eq!(get_default_variant(meta.block_type.as_str()), Some(meta.variants[0]));
        }
        assert_eq!(
            get_block_meta("hero").unwrap().default_settings["buttonText"],
            "Shop now"
        );
    }

    #[test]
    fn test_unknown_types_are_rejected_quietly() {
        assert!(get_block_meta("carousel-3d").is_none());
        assert!(get_default_variant("carousel-3d").is_none());
        assert!(!can_block_be_child_of("carousel-3d", "section"));
        assert!(!can_block_be_child_of("rich-text", "carousel-3d"));
    }

    #[test]
    fn test_non_container_never_accepts_children() {
        assert!(!can_block_be_child_of("rich-text", "hero"));
        assert!(!can_block_be_child_of("video", "gallery"));
    }

    #[test]
    fn test_parent_whitelist_is_checked() {
        // Columns does not list newsletter
        assert!(!can_block_be_child_of("newsletter", "columns"));
        assert!(can_block_be_child_of("rich-text", "columns"));
    }

    #[test]
    fn test_child_whitelist_is_checked() {
        // Columns lists gallery, but gallery only consents to sections
        assert!(COLUMN_CHILDREN.contains(&BlockType::Gallery));
        assert!(!can_block_be_child_of("gallery", "columns"));
        assert!(can_block_be_child_of("gallery", "section"));
    }

    #[test]
    fn test_root_only_blocks() {
        assert!(!can_block_be_child_of("header", "section"));
        assert!(!can_block_be_child_of("footer", "section"));
        assert!(!can_block_be_child_of("section", "section"));
        assert!(can_block_be_child_of("columns", "section"));
    }

    #[test]
    fn test_variant_validation() {
        assert!(is_valid_variant("hero", "split"));
        assert!(!is_valid_variant("hero", "grid"));
        assert!(!is_valid_variant("nope", "grid"));
    }

    #[test]
    fn test_category_lookup() {
        let commerce: Vec<_> = blocks_in_category(BlockCategory::Commerce)
            .iter()
            .map(|m| m.block_type)
            .collect();
        assert_eq!(
            commerce,
            vec![BlockType::ProductGrid, BlockType::FeaturedProduct, BlockType::CategoryList]
        );
    }
}
