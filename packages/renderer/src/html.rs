//! Serialize virtual DOM to an HTML string.

use crate::vdom::VNode;

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap output in a full document with this title
    pub document_title: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            document_title: None,
        }
    }
}

const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr"];

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;").replace('\'', "&#39;")
}

fn open_tag(tag: &str, attributes: &std::collections::BTreeMap<String, String>) -> String {
    let mut open = format!("<{tag}");
    for (name, value) in attributes {
        if value.is_empty() {
            open.push_str(&format!(" {name}"));
        } else {
            open.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
    }
    open.push('>');
    open
}

/// Elements holding only text stay on one line
fn is_inline(children: &[VNode]) -> bool {
    children.iter().all(|c| matches!(c, VNode::Text { .. } | VNode::Html { .. }))
}

fn inline_content(children: &[VNode]) -> String {
    children
        .iter()
        .map(|c| match c {
            VNode::Text { content } => escape_text(content),
            VNode::Html { content } => content.clone(),
            _ => String::new(),
        })
        .collect()
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            children,
            ..
        } => {
            let open = open_tag(tag, attributes);

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                ctx.add_line(&open);
            } else if is_inline(children) {
                ctx.add_line(&format!("{open}{}</{tag}>", inline_content(children)));
            } else {
                ctx.add_line(&open);
                ctx.indent();
                for child in children {
                    write_node(child, ctx);
                }
                ctx.dedent();
                ctx.add_line(&format!("</{tag}>"));
            }
        }
        VNode::Text { content } => ctx.add_line(&escape_text(content)),
        VNode::Html { content } => ctx.add_line(content),
        VNode::Comment { content } => ctx.add_line(&format!("<!-- {} -->", content.replace("--", "- -"))),
    }
}

pub fn render_html(nodes: &[VNode], options: HtmlOptions) -> String {
    let title = options.document_title.clone();
    let mut ctx = Context::new(options);

    if let Some(title) = &title {
        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();
        ctx.add_line("<head>");
        ctx.indent();
        ctx.add_line("<meta charset=\"utf-8\">");
        ctx.add_line(&format!("<title>{}</title>", escape_text(title)));
        ctx.dedent();
        ctx.add_line("</head>");
        ctx.add_line("<body>");
        ctx.indent();
    }

    for node in nodes {
        write_node(node, &mut ctx);
    }

    if title.is_some() {
        ctx.dedent();
        ctx.add_line("</body>");
        ctx.dedent();
        ctx.add_line("</html>");
    }

    ctx.get_output()
}
