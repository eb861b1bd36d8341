use crate::config::Config;
use crate::page_file::PageFile;
use anyhow::{anyhow, Result};
use bento_model::Viewport;
use bento_renderer::{page_document, render_page, to_html, HtmlOptions, Mode};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page file (page + blocks JSON)
    pub input: PathBuf,

    /// Viewport (mobile, desktop)
    #[arg(short, long, default_value = "desktop")]
    pub viewport: String,

    /// Render the editor canvas instead of the public page
    #[arg(long)]
    pub editing: bool,

    /// Output format (html, json)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let viewport: Viewport = args.viewport.parse().map_err(|e: String| anyhow!(e))?;
    let file = PageFile::load(&args.input)?;

    let output = render_output(&file, &config, viewport, &args)?;

    if args.stdout {
        println!("{}", output);
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(dir) => PathBuf::from(cwd).join(dir),
        None => config.get_out_dir(cwd),
    };
    fs::create_dir_all(&out_dir)?;

    let extension = if args.format == "json" { "json" } else { "html" };
    let output_path = out_dir.join(format!(
        "{}.{}.{}",
        file.page.slug.trim_start_matches('/'),
        viewport.as_str(),
        extension
    ));
    fs::write(&output_path, output)?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.input.display(),
        output_path.display()
    );
    Ok(())
}

pub fn render_output(
    file: &PageFile,
    config: &Config,
    viewport: Viewport,
    args: &RenderArgs,
) -> Result<String> {
    let mode = if args.editing {
        Mode::EditingCanvas
    } else {
        Mode::PublicReadOnly
    };
    let rendered = render_page(
        &file.page,
        &file.blocks,
        viewport,
        mode,
        &config.metrics(viewport),
    );
    tracing::debug!(
        page = %file.page.id,
        viewport = viewport.as_str(),
        blocks = file.blocks.len(),
        format = %args.format,
        "page rendered"
    );

    match args.format.as_str() {
        "html" if args.editing => Ok(to_html(&rendered.root, &HtmlOptions::default())),
        "html" => Ok(page_document(&file.page, &rendered, &HtmlOptions::default())),
        "json" => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "root": rendered.root,
            "layout": rendered.layout,
        }))?),
        other => Err(anyhow!("Unknown format: {}. Use: html or json", other)),
    }
}
