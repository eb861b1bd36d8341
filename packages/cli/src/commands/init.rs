use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::page_file::PageFile;
use anyhow::Result;
use bento_model::{Block, BlockData, BlockType, LayoutType, Page};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Slug of the example page
    #[arg(short, long, default_value = "me")]
    pub slug: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
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

    println!("{}", "📝 Initializing Bento project...".bright_blue().bold());

    let config = Config {
        out_dir: Some("dist".to_string()),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let page_path = PathBuf::from(cwd).join("page.json");
    if !page_path.exists() {
        example_page(&args.slug).save(&page_path)?;
        println!("  {} Created page.json", "✓".green());
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit page.json");
    println!("  2. Run: bento render page.json");
    println!("  3. Check output in dist/");

    Ok(())
}

fn example_page(slug: &str) -> PageFile {
    let page_id = "page-1";
    let mut page = Page::new(page_id, slug).with_layout(LayoutType::Special);
    page.title = "My links".to_string();

    let blocks = vec![
        Block::new("intro", page_id, BlockType::Text)
            .with_position(0)
            .with_data(
                BlockData::new()
                    .with("text", "Hi, welcome to my page")
                    .with("gridSpanX", 4)
                    .with("mobileSpanX", 2),
            ),
        Block::new("site", page_id, BlockType::Link)
            .with_position(1)
            .with_data(
                BlockData::new()
                    .with("url", "https://example.com")
                    .with("title", "My website")
                    .with("gridSpanX", 2),
            ),
        Block::new("photo", page_id, BlockType::Image)
            .with_position(2)
            .with_data(
                BlockData::new()
                    .with("src", "https://example.com/photo.jpg")
                    .with("alt", "Photo")
                    .with("gridSpanX", 2)
                    .with("gridSpanY", 2),
            ),
    ];

    PageFile { page, blocks }
}
