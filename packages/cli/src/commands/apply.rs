use crate::page_file::PageFile;
use anyhow::{Context, Result};
use bento_editor::{BlockMutation, BlockStore};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Page file (page + blocks JSON)
    pub input: PathBuf,

    /// Mutation log (JSON array of mutations)
    pub mutations: PathBuf,

    /// Renumber positions after the last mutation
    #[arg(long)]
    pub renumber: bool,

    /// Write the resulting blocks back to the page file
    #[arg(short, long)]
    pub write: bool,
}

pub fn apply(args: ApplyArgs, _cwd: &str) -> Result<()> {
    let mut file = PageFile::load(&args.input)?;
    let content = std::fs::read_to_string(&args.mutations)
        .with_context(|| format!("Failed to read {}", args.mutations.display()))?;
    let mutations: Vec<BlockMutation> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.mutations.display()))?;

    let mut store = BlockStore::from_blocks(std::mem::take(&mut file.blocks));
    let failed = apply_all(&mut store, &mutations);

    if args.renumber {
        if let Some(positions) = store.renumber() {
            println!("  {} renumbered {} blocks", "✓".green(), positions.len());
        }
    }

    println!();
    if failed == 0 {
        println!(
            "{} Applied {} mutations, store version {}",
            "✅".green(),
            mutations.len(),
            store.version()
        );
    } else {
        println!(
            "{} Applied {} mutations, {} failed",
            "⚠️".yellow(),
            mutations.len() - failed,
            failed
        );
    }

    if args.write {
        file.blocks = store.blocks().to_vec();
        file.save(&args.input)?;
        println!("  {} Updated {}", "✓".green(), args.input.display());
    }

    Ok(())
}

/// Apply in order, reporting each result. Returns the number of failures.
pub fn apply_all(store: &mut BlockStore, mutations: &[BlockMutation]) -> usize {
    let mut failed = 0;
    for mutation in mutations {
        let target = mutation
            .target()
            .map(|id| id.to_string())
            .unwrap_or_default();
        match store.apply(mutation) {
            Ok(result) => println!(
                "  {} {} {} (v{})",
                "✓".green(),
                mutation.name(),
                target,
                result.version
            ),
            Err(e) => {
                failed += 1;
                eprintln!(
                    "  {} {} {} - {}",
                    "✗".red(),
                    mutation.name(),
                    target,
                    e.to_string().red()
                );
            }
        }
    }
    failed
}
