use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use storefront_blocks::{validate_layout, Diagnostic, DiagnosticLevel, PageLayout};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Layout JSON file or directory of layouts (defaults to the configured pages directory)
    pub input: Option<PathBuf>,

    /// Also list files without issues
    #[arg(short, long)]
    pub all: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    diagnostics: usize,
    errors: usize,
    warnings: usize,
    files: usize,
}

/// Explicit input, or the pages directory from `storefront.config.json`
fn resolve_input(input: Option<PathBuf>, cwd: &str) -> Result<PathBuf> {
    match input {
        Some(path) => Ok(path),
        None => Ok(Config::load(cwd)?.get_pages_dir(cwd)),
    }
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let input = resolve_input(args.input, cwd)?;

    println!("🔍 {} layout validation", "Starting".green().bold());
    println!("   Input: {}", input.display());
    println!();

    let files = if input.is_file() {
        vec![input.clone()]
    } else if input.is_dir() {
        let files = find_layout_files(&input);
        println!("   Found {} layout files", files.len());
        println!();
        files
    } else {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            input.display()
        ));
    };

    let mut totals = Totals::default();
    for file in &files {
        let (diagnostics, errors, warnings) = validate_file(file, args.all, &args.format)?;
        totals.diagnostics += diagnostics;
        totals.errors += errors;
        totals.warnings += warnings;
        totals.files += 1;
    }

    println!();
    println!(
        "✨ {} Validation complete!",
        if totals.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", totals.files);
    println!("   Total diagnostics: {}", totals.diagnostics);

    if totals.errors > 0 {
        println!("   {} {}", "Errors:".red(), totals.errors);
    }
    if totals.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), totals.warnings);
    }
    if totals.errors == 0 && totals.warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }

    // Exit with error code if there are errors
    if totals.errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn count(diagnostics: &[Diagnostic], level: DiagnosticLevel) -> usize {
    diagnostics.iter().filter(|d| d.level == level).count()
}

fn validate_file(file_path: &Path, verbose: bool, format: &str) -> Result<(usize, usize, usize)> {
    let source = fs::read_to_string(file_path)?;

    let layout = match PageLayout::from_json(&source) {
        Ok(layout) => layout,
        Err(err) => {
            eprintln!(
                "{} Failed to parse {}: {}",
                "✗".red(),
                file_path.display(),
                err
            );
            return Ok((0, 1, 0));
        }
    };

    let diagnostics = validate_layout(&layout);

    if diagnostics.is_empty() {
        if verbose {
            println!("{} {}", "✓".green(), file_path.display());
        }
        return Ok((0, 0, 0));
    }

    let errors = count(&diagnostics, DiagnosticLevel::Error);
    let warnings = count(&diagnostics, DiagnosticLevel::Warning);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        println!("{} ({})", file_path.display(), layout.slug);

        for diagnostic in &diagnostics {
            let level_str = match diagnostic.level {
                DiagnosticLevel::Error => "error".red().bold(),
                DiagnosticLevel::Warning => "warning".yellow().bold(),
            };

            match &diagnostic.block_id {
                Some(id) => println!("  {} [{}] {}: {}", level_str, diagnostic.rule, id.bright_white(), diagnostic.message),
                None => println!("  {} [{}] {}", level_str, diagnostic.rule, diagnostic.message),
            }

            if let Some(suggestion) = &diagnostic.suggestion {
                println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
            }
        }

        println!();
    }

    Ok((diagnostics.len(), errors, warnings))
}

fn find_layout_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "json"))
        .collect()
}
