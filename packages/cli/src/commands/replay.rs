use crate::config::Config;
use crate::page_file::PageFile;
use anyhow::{anyhow, Context, Result};
use bento_editor::{EditSession, Effect};
use bento_model::{Axis, BlockData, BlockId, LayoutType, Point, Viewport};
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Page file (page + blocks JSON)
    pub input: PathBuf,

    /// Gesture script (JSON array of steps)
    pub script: PathBuf,

    /// Viewport the session starts on (mobile, desktop)
    #[arg(short, long, default_value = "desktop")]
    pub viewport: String,

    /// Write the resulting blocks back to the page file
    #[arg(short, long)]
    pub write: bool,
}

/// One scripted editor input
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    BeginResize { id: BlockId, axis: Axis },
    FinishResize,
    BeginDrag { id: BlockId, x: f64, y: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Select { id: BlockId },
    SetViewport { viewport: Viewport },
    EditContent { id: BlockId, patch: BlockData },
    Delete { id: BlockId },
    SetLayout { layout: LayoutType },
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let viewport: Viewport = args.viewport.parse().map_err(|e: String| anyhow!(e))?;
    let mut file = PageFile::load(&args.input)?;

    let content = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.script.display()))?;

    println!(
        "{}",
        format!("▶ Replaying {} steps on /{}", steps.len(), file.page.slug)
            .bright_blue()
            .bold()
    );

    let mut session = EditSession::new("replay", file.page.clone(), file.blocks.clone());
    session.set_viewport(viewport);
    session.set_metrics(config.metrics(viewport));

    let mut persisted = 0;
    for (n, step) in steps.iter().enumerate() {
        match run_step(&mut session, &config, step) {
            Ok(effects) => {
                for effect in &effects {
                    if is_remote(effect) {
                        persisted += 1;
                    }
                    println!("  {:>3} {}", n + 1, describe(effect));
                }
            }
            Err(e) => {
                tracing::debug!(step = n + 1, ?step, error = %e, "step refused");
                println!("  {:>3} {} {}", n + 1, "✗".red(), e.to_string().red());
            }
        }
    }

    let order: Vec<&str> = session
        .store()
        .blocks()
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    println!();
    println!("Order: {}", order.join(", ").cyan());
    println!("{} {} remote writes", "✅".green(), persisted);

    if args.write {
        file.page = session.page().clone();
        file.blocks = session.store().blocks().to_vec();
        file.save(&args.input)?;
        println!("  {} Updated {}", "✓".green(), args.input.display());
    }

    Ok(())
}

/// Feed one step to the session. Pointer coordinates are canvas pixels.
pub fn run_step(session: &mut EditSession, config: &Config, step: &Step) -> Result<Vec<Effect>> {
    let effects = match step {
        Step::BeginResize { id, axis } => session.begin_resize(id, *axis)?,
        Step::FinishResize => session.finish_resize()?,
        Step::BeginDrag { id, x, y } => session.begin_drag(id, Point::new(*x, *y))?,
        Step::PointerDown { x, y } => session.pointer_down(Point::new(*x, *y)),
        Step::PointerMove { x, y } => session.pointer_move(Point::new(*x, *y)),
        Step::PointerUp { x, y } => session.pointer_up(Point::new(*x, *y)),
        Step::Select { id } => {
            session.select(id)?;
            Vec::new()
        }
        Step::SetViewport { viewport } => {
            session.set_viewport(*viewport);
            session.set_metrics(config.metrics(*viewport));
            vec![Effect::RenderNeeded]
        }
        Step::EditContent { id, patch } => session.edit_content(id, patch.clone())?,
        Step::Delete { id } => session.delete_block(id)?,
        Step::SetLayout { layout } => session.set_layout_type(*layout)?,
    };
    Ok(effects)
}

fn is_remote(effect: &Effect) -> bool {
    !matches!(effect, Effect::RenderNeeded | Effect::SuppressScroll { .. })
}

fn describe(effect: &Effect) -> String {
    match effect {
        Effect::RenderNeeded => "render".dimmed().to_string(),
        Effect::SuppressScroll { enabled } => format!("scroll lock {}", if *enabled { "on" } else { "off" })
            .dimmed()
            .to_string(),
        Effect::PersistGeometry { id, patch } => {
            format!("{} geometry {} {}", "→".green(), id, serde_json::Value::Object(patch.0.clone()))
        }
        Effect::PersistContent { id, patch } => {
            format!("{} content {} ({} fields)", "→".green(), id, patch.len())
        }
        Effect::PersistOrder { positions } => {
            let order: Vec<String> = positions
                .iter()
                .map(|p| format!("{}={}", p.id, p.position))
                .collect();
            format!("{} order [{}]", "→".green(), order.join(", "))
        }
        Effect::DeleteBlock { id } => format!("{} delete {}", "→".yellow(), id),
        Effect::UpdatePage { path, .. } => format!("{} page update, revalidate {}", "→".green(), path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bento_model::{Block, BlockType, Page};

    fn session(ids: &[&str]) -> EditSession {
        let page = Page::new("p1", "alice").with_layout(LayoutType::Special);
        let blocks = ids
            .iter()
            .enumerate()
            .map(|(i, id)| Block::new(*id, "p1", BlockType::Link).with_position(i as u32))
            .collect();
        EditSession::new("test", page, blocks)
    }

    fn run(session: &mut EditSession, script: &str) -> Vec<Effect> {
        let config = Config::default();
        let steps: Vec<Step> = serde_json::from_str(script).unwrap();
        let mut effects = Vec::new();
        for step in &steps {
            effects.extend(run_step(session, &config, step).unwrap());
        }
        effects
    }

    #[test]
    fn test_drag_script() {
        // Default desktop cells are 171px wide, rows 120px tall
        let mut session = session(&["a", "b", "c", "d"]);
        let effects = run(
            &mut session,
            r#"[
                { "op": "beginDrag", "id": "a", "x": 80, "y": 60 },
                { "op": "pointerMove", "x": 450, "y": 60 },
                { "op": "pointerMove", "x": 270, "y": 60 },
                { "op": "pointerUp", "x": 270, "y": 60 }
            ]"#,
        );

        assert_eq!(session.store().ids(), vec![
            BlockId::new("b"),
            BlockId::new("a"),
            BlockId::new("c"),
            BlockId::new("d"),
        ]);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::PersistOrder { .. })));
    }

    #[test]
    fn test_resize_script() {
        let mut session = session(&["a"]);
        let effects = run(
            &mut session,
            r#"[
                { "op": "beginResize", "id": "a", "axis": "y" },
                { "op": "pointerDown", "x": 0, "y": 0 },
                { "op": "pointerMove", "x": 0, "y": 250 },
                { "op": "pointerUp", "x": 0, "y": 250 },
                { "op": "finishResize" }
            ]"#,
        );

        assert_eq!(
            effects.last(),
            Some(&Effect::PersistGeometry {
                id: BlockId::new("a"),
                patch: BlockData::new().with("gridSpanY", 3),
            })
        );
    }

    #[test]
    fn test_refused_step_is_an_error() {
        let mut session = session(&["a"]);
        let step = Step::FinishResize;
        assert!(run_step(&mut session, &Config::default(), &step).is_err());
    }

    #[test]
    fn test_remote_effects() {
        assert!(!is_remote(&Effect::RenderNeeded));
        assert!(is_remote(&Effect::DeleteBlock {
            id: BlockId::new("a")
        }));
    }
}
