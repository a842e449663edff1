//! # Block Templates
//!
//! One template per block type, selected by an exhaustive match so adding a
//! type to the registry fails to compile until it can be rendered.
//!
//! Templates are presentation only. Each returns the block's root node
//! annotated with `data-block-id` / `data-block-type`; text fields are
//! annotated with `data-field` so inline editors can attach to them. In edit
//! mode an empty field shows the placeholder instead of disappearing.

use crate::catalog::Product;
use crate::context::RenderContext;
use crate::vdom::VNode;
use serde_json::Value;
use storefront_blocks::{Block, BlockType};

pub(crate) fn render_template(
    block: &Block,
    block_type: BlockType,
    variant: &str,
    children: Vec<VNode>,
    ctx: &RenderContext,
) -> Option<VNode> {
    let t = Template {
        block,
        block_type,
        variant,
        ctx,
    };

    match block_type {
        BlockType::Header => Some(t.header()),
        BlockType::Hero => Some(t.hero()),
        BlockType::RichText => Some(t.rich_text()),
        BlockType::ProductGrid => Some(t.product_grid()),
        BlockType::FeaturedProduct => t.featured_product(),
        BlockType::CategoryList => Some(t.category_list()),
        BlockType::Gallery => Some(t.gallery()),
        BlockType::ImageWithText => Some(t.image_with_text()),
        BlockType::Testimonials => Some(t.testimonials()),
        BlockType::Newsletter => Some(t.newsletter()),
        BlockType::Faq => Some(t.faq()),
        BlockType::Video => t.video(),
        BlockType::Banner => Some(t.banner()),
        BlockType::Features => Some(t.features()),
        BlockType::Countdown => Some(t.countdown()),
        BlockType::LogoCloud => Some(t.logo_cloud()),
        BlockType::Contact => Some(t.contact()),
        BlockType::Section => Some(t.section(children)),
        BlockType::Columns => Some(t.columns(children)),
        BlockType::Footer => Some(t.footer()),
    }
}

struct Template<'a> {
    block: &'a Block,
    block_type: BlockType,
    variant: &'a str,
    ctx: &'a RenderContext,
}

fn item_str<'v>(item: &'v Value, key: &str) -> &'v str {
    item.get(key).and_then(Value::as_str).unwrap_or("")
}

impl<'a> Template<'a> {
    /// Root node of the block
    fn shell(&self, tag: &str) -> VNode {
        let name = self.block_type.as_str();
        VNode::element(tag)
            .with_key(self.block.id.clone())
            .with_attr("data-block-id", self.block.id.clone())
            .with_attr("data-block-type", name)
            .with_class(&format!("sf-{name}"))
            .with_class(&format!("sf-{name}--{}", self.variant))
    }

    fn setting(&self, key: &str) -> &'a str {
        self.block.text(key).unwrap_or("")
    }

    fn items(&self, key: &str) -> &'a [Value] {
        self.block
            .settings
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Inline-editable text at `path` holding `value`.
    ///
    /// `None` in view mode when there is nothing to show.
    fn field_at(&self, tag: &str, path: &str, value: &str, editable: &str) -> Option<VNode> {
        let node = VNode::element(tag).with_attr("data-field", path);

        if !self.ctx.is_edit() {
            if value.is_empty() {
                return None;
            }
            return Some(match editable {
                "rich-text" => node.with_child(VNode::html(value)),
                _ => node.with_text(value),
            });
        }

        let node = node
            .with_attr("data-block-id", self.block.id.clone())
            .with_attr("data-editable", editable);

        if value.trim().is_empty() {
            return Some(
                node.with_attr("data-placeholder", "true")
                    .with_text(self.ctx.placeholder.clone()),
            );
        }

        Some(match editable {
            "rich-text" => node.with_child(VNode::html(value)),
            _ => node.with_text(value),
        })
    }

    fn text(&self, tag: &str, key: &str) -> Option<VNode> {
        self.field_at(tag, key, self.setting(key), "text")
    }

    fn multiline(&self, tag: &str, key: &str) -> Option<VNode> {
        self.field_at(tag, key, self.setting(key), "multiline")
    }

    fn item_text(&self, tag: &str, list: &str, index: usize, item: &Value, key: &str) -> Option<VNode> {
        self.field_at(tag, &format!("{list}.{index}.{key}"), item_str(item, key), "text")
    }

    fn image(url: &str, alt: &str) -> Option<VNode> {
        if url.is_empty() {
            return None;
        }
        Some(VNode::element("img").with_attr("src", url).with_attr("alt", alt).with_attr("loading", "lazy"))
    }

    fn link(href: &str) -> VNode {
        VNode::element("a").with_attr("href", href)
    }

    fn header(&self) -> VNode {
        let nav = VNode::element("nav").with_children(
            self.items("links")
                .iter()
                .map(|link| Self::link(item_str(link, "href")).with_text(item_str(link, "label")))
                .collect(),
        );

        let mut header = self
            .shell("header")
            .with_child(Self::link("/").with_children(self.text("span", "storeName").into_iter().collect()))
            .with_child(nav);

        if self.block.settings.get("showCart").and_then(Value::as_bool).unwrap_or(true) {
            header = header.with_child(Self::link("/cart").with_class("sf-cart").with_text("Cart"));
        }
        header
    }

    fn hero(&self) -> VNode {
        let mut hero = self.shell("section");

        let image_url = self.setting("imageUrl");
        if !image_url.is_empty() {
            hero = hero.with_attr("style", format!("background-image: url('{image_url}')"));
        }

        let button = self
            .text("span", "buttonText")
            .map(|label| Self::link(self.setting("buttonLink")).with_class("sf-button").with_child(label));

        hero.with_children(
            [self.text("h1", "title"), self.multiline("p", "subtitle"), button]
                .into_iter()
                .flatten()
                .collect(),
        )
    }

    fn rich_text(&self) -> VNode {
        let content = self.field_at("div", "content", self.setting("content"), "rich-text");
        self.shell("section").with_children(content.into_iter().collect())
    }

    fn product_card(&self, product: &Product) -> VNode {
        let currency = &self.ctx.catalog.currency;
        let mut price = VNode::element("span")
            .with_class("sf-price")
            .with_text(currency.format_price(product.price_cents));

        if let Some(compare) = product.compare_at_cents.filter(|_| product.is_on_sale()) {
            price = price.with_child(VNode::element("s").with_text(currency.format_price(compare)));
        }

        VNode::element("li").with_key(product.id.clone()).with_child(
            Self::link(&product.href())
                .with_attr("data-product-id", product.id.clone())
                .with_children(Self::image(product.image_url.as_deref().unwrap_or(""), &product.name).into_iter().collect())
                .with_child(VNode::element("h3").with_text(product.name.clone()))
                .with_child(price),
        )
    }

    fn product_grid(&self) -> VNode {
        let limit = self
            .block
            .settings
            .get("limit")
            .and_then(Value::as_u64)
            .unwrap_or(8) as usize;
        let category = self.block.text("categoryId").filter(|c| !c.is_empty());
        let columns = self
            .block
            .settings
            .get("columns")
            .and_then(Value::as_u64)
            .unwrap_or(4);

        let products = self.ctx.catalog.products_for_grid(category, limit);
        let list = VNode::element("ul")
            .with_attr("data-columns", columns.to_string())
            .with_children(products.into_iter().map(|p| self.product_card(p)).collect());

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(list)
    }

    fn featured_product(&self) -> Option<VNode> {
        let product = self
            .block
            .text("productId")
            .and_then(|id| self.ctx.catalog.product(id));

        let Some(product) = product else {
            // Nothing to feature yet; only the editor gets a hint
            return self.ctx.is_edit().then(|| {
                self.shell("section")
                    .with_child(VNode::element("p").with_class("sf-notice").with_text("Select a product to feature"))
            });
        };

        let currency = &self.ctx.catalog.currency;
        Some(
            self.shell("section")
                .with_children(Self::image(product.image_url.as_deref().unwrap_or(""), &product.name).into_iter().collect())
                .with_child(VNode::element("h2").with_text(product.name.clone()))
                .with_child(VNode::element("span").with_class("sf-price").with_text(currency.format_price(product.price_cents)))
                .with_child(
                    Self::link(&product.href())
                        .with_class("sf-button")
                        .with_children(self.text("span", "buttonText").into_iter().collect()),
                ),
        )
    }

    fn category_list(&self) -> VNode {
        let ids: Vec<&str> = self.items("categories").iter().filter_map(Value::as_str).collect();
        let categories = self.ctx.catalog.categories_by_id(&ids);

        let list = VNode::element("ul").with_children(
            categories
                .into_iter()
                .map(|c| {
                    VNode::element("li").with_key(c.id.clone()).with_child(
                        Self::link(&format!("/categories/{}", c.id))
                            .with_children(Self::image(c.image_url.as_deref().unwrap_or(""), &c.name).into_iter().collect())
                            .with_text(c.name.clone()),
                    )
                })
                .collect(),
        );

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(list)
    }

    fn gallery(&self) -> VNode {
        let images = self
            .items("images")
            .iter()
            .filter_map(|img| Self::image(item_str(img, "url"), item_str(img, "alt")))
            .map(|img| VNode::element("figure").with_child(img))
            .collect();

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(VNode::element("div").with_class("sf-gallery-items").with_children(images))
    }

    fn image_with_text(&self) -> VNode {
        let image = Self::image(self.setting("imageUrl"), self.setting("title"));
        let copy = VNode::element("div")
            .with_children([self.text("h2", "title"), self.multiline("p", "text")].into_iter().flatten().collect());

        self.shell("section").with_children(image.into_iter().collect()).with_child(copy)
    }

    fn testimonials(&self) -> VNode {
        let quotes = self
            .items("items")
            .iter()
            .enumerate()
            .map(|(i, item)| {
                VNode::element("blockquote").with_children(
                    [
                        self.item_text("p", "items", i, item, "quote"),
                        self.item_text("cite", "items", i, item, "author"),
                    ]
                    .into_iter()
                    .flatten()
                    .collect(),
                )
            })
            .collect();

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_children(quotes)
    }

    fn newsletter(&self) -> VNode {
        let form = VNode::element("form")
            .with_attr("data-form", "newsletter")
            .with_attr("data-block-id", self.block.id.clone())
            .with_child(
                VNode::element("input")
                    .with_attr("type", "email")
                    .with_attr("name", "email")
                    .with_attr("required", "")
                    .with_attr("placeholder", self.setting("placeholder")),
            )
            .with_child(
                VNode::element("button")
                    .with_attr("type", "submit")
                    .with_children(self.text("span", "buttonText").into_iter().collect()),
            );

        self.shell("section")
            .with_children([self.text("h2", "title"), self.multiline("p", "description")].into_iter().flatten().collect())
            .with_child(form)
    }

    fn faq(&self) -> VNode {
        let entries = self
            .items("items")
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let question = self.item_text("summary", "items", i, item, "question");
                let answer = self.field_at("div", &format!("items.{i}.answer"), item_str(item, "answer"), "multiline");
                VNode::element("details").with_children([question, answer].into_iter().flatten().collect())
            })
            .collect();

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_children(entries)
    }

    fn video(&self) -> Option<VNode> {
        let url = self.setting("url");
        if url.is_empty() && !self.ctx.is_edit() {
            return None;
        }

        let player = if url.is_empty() {
            VNode::element("p").with_class("sf-notice").with_text("Add a video URL")
        } else {
            VNode::element("iframe")
                .with_attr("src", url)
                .with_attr("allowfullscreen", "")
                .with_attr("title", self.setting("title"))
        };

        Some(
            self.shell("section")
                .with_children(self.text("h2", "title").into_iter().collect())
                .with_child(player),
        )
    }

    fn banner(&self) -> VNode {
        let text = self.text("p", "text");
        let link = self.setting("link");

        let body: Vec<VNode> = if link.is_empty() {
            text.into_iter().collect()
        } else {
            vec![Self::link(link).with_children(text.into_iter().collect())]
        };
        self.shell("div").with_attr("role", "note").with_children(body)
    }

    fn features(&self) -> VNode {
        let items = self
            .items("items")
            .iter()
            .enumerate()
            .map(|(i, item)| {
                VNode::element("li").with_children(
                    [
                        self.item_text("h3", "items", i, item, "title"),
                        self.item_text("p", "items", i, item, "description"),
                    ]
                    .into_iter()
                    .flatten()
                    .collect(),
                )
            })
            .collect();

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(VNode::element("ul").with_children(items))
    }

    fn countdown(&self) -> VNode {
        let mut timer = VNode::element("time").with_class("sf-countdown-timer");
        if let Some(ends_at) = self.block.text("endsAt") {
            timer = timer.with_attr("datetime", ends_at).with_attr("data-ends-at", ends_at);
        }

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(timer)
    }

    fn logo_cloud(&self) -> VNode {
        let logos = self
            .items("logos")
            .iter()
            .filter_map(|logo| Self::image(item_str(logo, "url"), item_str(logo, "alt")))
            .collect();

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(VNode::element("div").with_class("sf-logos").with_children(logos))
    }

    fn contact(&self) -> VNode {
        let mut details = VNode::element("address");

        let email = self.setting("email");
        if !email.is_empty() {
            details = details.with_child(Self::link(&format!("mailto:{email}")).with_text(email));
        }
        let phone = self.setting("phone");
        if !phone.is_empty() {
            details = details.with_child(Self::link(&format!("tel:{phone}")).with_text(phone));
        }
        details = details.with_children(self.multiline("p", "address").into_iter().collect());

        self.shell("section")
            .with_children(self.text("h2", "title").into_iter().collect())
            .with_child(details)
    }

    fn section(&self, children: Vec<VNode>) -> VNode {
        let mut section = self
            .shell("section")
            .with_attr("data-padding", self.block.text("padding").unwrap_or("medium"));

        let background = self.setting("background");
        if !background.is_empty() {
            section = section.with_attr("style", format!("background: {background}"));
        }
        section.with_children(children)
    }

    fn columns(&self, children: Vec<VNode>) -> VNode {
        self.shell("div")
            .with_attr("data-gap", self.block.text("gap").unwrap_or("medium"))
            .with_children(
                children
                    .into_iter()
                    .map(|child| VNode::element("div").with_class("sf-column").with_child(child))
                    .collect(),
            )
    }

    fn footer(&self) -> VNode {
        let links = VNode::element("nav").with_children(
            self.items("links")
                .iter()
                .map(|link| Self::link(item_str(link, "href")).with_text(item_str(link, "label")))
                .collect(),
        );

        self.shell("footer")
            .with_child(links)
            .with_children(self.text("small", "copyright").into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Currency, Product};
    use storefront_editor::EditorConfig;

    fn render(block: &Block, ctx: &RenderContext) -> Option<VNode> {
        let block_type = block.block_type()?;
        let variant = block.effective_variant()?;
        render_template(block, block_type, variant, Vec::new(), ctx)
    }

    #[test]
    fn test_every_type_renders_with_defaults_in_edit_mode() {
        let ctx = RenderContext::edit(Catalog::default(), &EditorConfig::default());

        for block_type in BlockType::ALL {
            let meta = block_type.meta();
            let mut block = Block::new("b1", block_type);
            block.settings = meta.default_settings.clone();

            let node = render(&block, &ctx);
            assert!(node.is_some(), "{block_type} rendered nothing");
            assert_eq!(node.unwrap().attr("data-block-type"), Some(block_type.as_str()));
        }
    }

    #[test]
    fn test_empty_field_shows_placeholder_only_in_edit_mode() {
        let block = Block::new("hero-1", BlockType::Hero).with_setting("title", "");

        let edit = render(&block, &RenderContext::edit(Catalog::default(), &EditorConfig::default())).unwrap();
        let title = edit.find_by_attr("data-field", "title").unwrap();
        assert_eq!(title.attr("data-placeholder"), Some("true"));
        assert_eq!(title.text_content(), "Click to edit");

        let view = render(&block, &RenderContext::view(Catalog::default())).unwrap();
        assert!(view.find_by_attr("data-field", "title").is_none());
    }

    #[test]
    fn test_product_grid_honours_limit_and_category() {
        let catalog = Catalog::new(
            vec![
                Product::new("p1", "Mug", 1200).in_category("kitchen"),
                Product::new("p2", "Shirt", 2500).in_category("apparel"),
                Product::new("p3", "Plate", 900).in_category("kitchen"),
            ],
            Currency::usd(),
        );
        let block = Block::new("grid", BlockType::ProductGrid)
            .with_setting("limit", 1)
            .with_setting("categoryId", "kitchen");

        let node = render(&block, &RenderContext::view(catalog)).unwrap();
        let mut cards = Vec::new();
        node.find_all_with_attr("data-product-id", &mut cards);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].attr("data-product-id"), Some("p1"));
        assert!(node.text_content().contains("$12.00"));
    }

    #[test]
    fn test_featured_product_without_product() {
        let block = Block::new("f", BlockType::FeaturedProduct).with_setting("productId", "missing");

        assert!(render(&block, &RenderContext::view(Catalog::default())).is_none());
        assert!(render(&block, &RenderContext::edit(Catalog::default(), &EditorConfig::default())).is_some());
    }

    #[test]
    fn test_list_items_get_indexed_field_paths() {
        let block = Block::new("faq", BlockType::Faq).with_setting(
            "items",
            serde_json::json!([{ "question": "Shipping?", "answer": "Yes" }]),
        );

        let node = render(&block, &RenderContext::edit(Catalog::default(), &EditorConfig::default())).unwrap();
        let question = node.find_by_attr("data-field", "items.0.question").unwrap();
        assert_eq!(question.text_content(), "Shipping?");
    }
}
