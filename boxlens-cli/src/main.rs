//! Boxlens CLI
//!
//! Injects debug annotations into an HTML fragment and emits the
//! standalone preview document. When overflow detection is enabled and a
//! layout snapshot from the host renderer is supplied, also runs the
//! overflow scan and prints a report.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use boxlens_debug::{AnnotationConfig, OverflowDetector, OverflowRecord, inject};
use boxlens_surface::{LayoutSnapshot, RenderSurface, Size, SnapshotLayout};

/// Boxlens — debug-annotation preview for HTML/CSS authoring
#[derive(Parser, Debug)]
#[command(name = "boxlens")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Emit the plain preview document for a fragment file
    boxlens page.html

    # Inline markup, with the box-model hover layer enabled
    boxlens --html '<button>Go</button>' --box-model

    # Full debug preview, dark theme
    boxlens page.html --box-model --overflows --dark

    # Overflow report against a layout snapshot from the host renderer
    boxlens page.html --overflows --layout layout.json

    # Same report, machine-readable
    boxlens page.html --overflows --layout layout.json --json
"#)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to the HTML fragment to preview
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Parse an HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Enable the box-model hover visualizer
    #[arg(long)]
    box_model: bool,

    /// Enable overflow detection
    #[arg(long)]
    overflows: bool,

    /// Dark preview theme
    #[arg(long)]
    dark: bool,

    /// Layout snapshot (JSON) from the host renderer; with --overflows,
    /// runs the scan against it and prints a report
    #[arg(long, value_name = "FILE", requires = "overflows")]
    layout: Option<PathBuf>,

    /// Print the overflow report as JSON instead of colored text
    #[arg(long)]
    json: bool,

    /// Write the preview document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Viewport width for the layout pass
    #[arg(long, default_value = "1280")]
    width: f32,

    /// Viewport height for the layout pass
    #[arg(long, default_value = "800")]
    height: f32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let markup = if let Some(html) = &cli.html {
        html.clone()
    } else if let Some(path) = &cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        anyhow::bail!("pass a markup FILE or --html");
    };

    let config = AnnotationConfig {
        show_box_model: cli.box_model,
        show_overflows: cli.overflows,
        dark_mode: cli.dark,
    };
    let document = inject(&markup, &config);

    match &cli.out {
        Some(path) => fs::write(path, &document.html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", document.html),
    }

    if let (true, Some(snapshot_path)) = (cli.overflows, &cli.layout) {
        let json = fs::read_to_string(snapshot_path)
            .with_context(|| format!("failed to read {}", snapshot_path.display()))?;
        let snapshot = LayoutSnapshot::from_json(&json)
            .with_context(|| format!("invalid layout snapshot {}", snapshot_path.display()))?;

        let mut surface = RenderSurface::new(
            &document.html,
            Rc::new(SnapshotLayout::new(snapshot)),
            Size::new(cli.width, cli.height),
        );
        let records = OverflowDetector::new().scan(&mut surface);

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            print_report(&records);
        }
    }

    Ok(())
}

/// Colored per-element overflow report, written to stderr so the preview
/// document on stdout stays pipeable.
fn print_report(records: &[OverflowRecord]) {
    if records.is_empty() {
        eprintln!("{}", "no overflows detected".green());
        return;
    }
    eprintln!(
        "{} {}",
        records.len().red().bold(),
        "overflow(s) detected".red().bold()
    );
    for record in records {
        eprintln!("  {}  {}", record.identity.yellow(), record.details_text().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn layout_snapshots_require_the_overflow_layer() {
        let bare = Cli::try_parse_from(["boxlens", "--html", "<div>x</div>", "--layout", "l.json"]);
        assert!(bare.is_err());

        let cli = Cli::try_parse_from([
            "boxlens",
            "--html",
            "<div>x</div>",
            "--overflows",
            "--layout",
            "l.json",
        ])
        .unwrap();
        assert!(cli.overflows);
        assert!(cli.layout.is_some());
    }

    #[test]
    fn argument_definitions_are_consistent() {
        Cli::command().debug_assert();
    }
}
