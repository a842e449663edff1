use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use storefront_blocks::{Block, BlockType, IdGenerator, PageLayout};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for page layouts
    #[arg(short, long, default_value = "pages")]
    pub pages_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

/// Starter homepage built from registry defaults
fn starter_homepage() -> PageLayout {
    let mut ids = IdGenerator::for_page("home");
    let blocks = [BlockType::Header, BlockType::Hero, BlockType::ProductGrid, BlockType::Footer]
        .into_iter()
        .enumerate()
        .map(|(i, block_type)| {
            let mut block = Block::new(ids.new_id(), block_type).with_order(i as i64);
            block.settings = block_type.meta().default_settings.clone();
            block
        })
        .collect();

    let mut layout = PageLayout::new("home").with_blocks(blocks);
    layout.is_homepage = true;
    layout
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing storefront...".bright_blue().bold());

    let pages_dir = PathBuf::from(cwd).join(&args.pages_dir);
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created {}/", "✓".green(), args.pages_dir);
    }

    let home = pages_dir.join("home.json");
    if !home.exists() {
        fs::write(&home, starter_homepage().to_json_pretty()?)?;
        println!("  {} Created {}/home.json", "✓".green(), args.pages_dir);
    }

    let config = Config {
        pages_dir: args.pages_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Storefront initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/home.json", args.pages_dir);
    println!("  2. Run: storefront validate {}", args.pages_dir);
    println!("  3. Run: storefront render {}/home.json", args.pages_dir);

    Ok(())
}
