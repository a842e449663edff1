use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use storefront_blocks::{all_block_meta, blocks_in_category, BlockCategory, BlockMeta};

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Only list blocks in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Output the registry as JSON
    #[arg(long)]
    pub json: bool,
}

fn nesting(list: Option<&[storefront_blocks::BlockType]>) -> String {
    match list {
        None => "any".to_string(),
        Some([]) => "none".to_string(),
        Some(types) => types.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", "),
    }
}

pub fn blocks(args: BlocksArgs, _cwd: &str) -> Result<()> {
    let entries: Vec<&BlockMeta> = match &args.category {
        Some(name) => {
            let category = BlockCategory::parse(name).ok_or_else(|| {
                let known: Vec<&str> = BlockCategory::ALL.iter().map(|c| c.as_str()).collect();
                anyhow!("Unknown category '{}'. Use one of: {}", name, known.join(", "))
            })?;
            blocks_in_category(category)
        }
        None => all_block_meta().iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for meta in entries {
        println!(
            "{} {} {}",
            meta.block_type.as_str().bright_white().bold(),
            format!("({})", meta.name).dimmed(),
            format!("[{}]", meta.category.as_str()).cyan()
        );
        println!("    variants: {}", meta.variants.join(", "));
        if meta.is_container {
            println!("    children: {}", nesting(meta.allowed_children));
        }
        if meta.allowed_parents.is_some() {
            println!("    parents:  {}", nesting(meta.allowed_parents));
        }
    }

    Ok(())
}
