use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use storefront_blocks::PageLayout;
use storefront_editor::HostContext;
use storefront_renderer::{
    render_html, BlockRenderer, Catalog, HtmlOptions, LiveBlockRenderer, RenderContext, VNode,
};
use tracing::info;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page layout JSON file
    pub layout: PathBuf,

    /// Catalog JSON (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Page URL, used to detect preview mode (`?mode=preview`)
    #[arg(long)]
    pub url: Option<String>,

    /// Render as if embedded in the editor frame
    #[arg(long)]
    pub embedded: bool,

    /// Emit the virtual DOM as JSON instead of HTML
    #[arg(long)]
    pub json: bool,

    /// Write compact HTML
    #[arg(long)]
    pub compact: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

fn load_catalog(args: &RenderArgs, config: &Config, cwd: &str) -> Result<Catalog> {
    let path = args.catalog.clone().or_else(|| config.get_catalog_path(cwd));

    let Some(path) = path else {
        return Ok(Catalog {
            currency: config.currency.clone(),
            ..Catalog::default()
        });
    };

    let source = fs::read_to_string(&path).with_context(|| format!("Cannot read catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&source)?;
    info!(products = catalog.products.len(), path = %path.display(), "Loaded catalog");
    Ok(catalog)
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    if !args.layout.exists() {
        return Err(anyhow!("Layout file does not exist: {}", args.layout.display()));
    }
    let source = fs::read_to_string(&args.layout)?;
    let layout = PageLayout::from_json(&source)
        .with_context(|| format!("Invalid layout {}", args.layout.display()))?;

    let host = match &args.url {
        Some(url) => HostContext::from_url(url, args.embedded)?,
        None if args.embedded => HostContext::editor(),
        None => HostContext::standalone(),
    };

    let catalog = load_catalog(&args, &config, cwd)?;
    let context = RenderContext::for_host(catalog, &host, &config.editor);
    let renderer = BlockRenderer::new(context);

    let nodes: Vec<VNode> = if host.is_editor() {
        LiveBlockRenderer::new(renderer, host).render(&layout)
    } else {
        let mut renderer = renderer;
        renderer.render(&layout).into_iter().map(|r| r.node).collect()
    };

    let output = if args.json {
        serde_json::to_string_pretty(&nodes)?
    } else {
        render_html(
            &nodes,
            HtmlOptions {
                pretty: !args.compact,
                document_title: Some(layout.slug.clone()),
                ..Default::default()
            },
        )
    };

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, output)?;
            eprintln!(
                "  {} {} → {} ({} blocks)",
                "✓".green(),
                args.layout.display(),
                path.display(),
                nodes.len()
            );
        }
        None => println!("{output}"),
    }

    Ok(())
}
