use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::compiler::compiler::{export, Dialect};
use crate::geometry::rect::{Rect, Size};
use crate::recorder::step::Step;
use crate::scan::scan_model::{ElementId, ScanPayload};
use crate::selection::session::{IngestReport, InspectorSession, ViewMode};
use crate::trace::logger::TraceLogger;

// ============================================================================
// inspect subcommand
// ============================================================================

#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub viewport: Size,
    /// One-based, as labelled in the output.
    pub select: Option<usize>,
    pub view_mode: ViewMode,
    pub tolerance: f64,
    pub trace: Option<String>,
}

/// Ingest and present a scan payload, then apply the requested selection.
pub fn inspect_scan(
    json: &str,
    options: &InspectOptions,
) -> Result<(InspectorSession, IngestReport), Box<dyn std::error::Error>> {
    let payload = ScanPayload::from_json(json)?;
    let mut session = InspectorSession::new(options.tolerance);
    if let Some(path) = &options.trace {
        session.attach_tracer(TraceLogger::new(path));
    }
    session.set_view_mode(options.view_mode);

    let report = session.ingest_payload(payload);
    session.present(options.viewport)?;

    if let Some(number) = options.select {
        let index = number.checked_sub(1).ok_or("element numbers start at 1")?;
        session.select(Some(ElementId(index)))?;
    }

    Ok((session, report))
}

pub fn cmd_inspect(
    scan_path: &str,
    options: &InspectOptions,
    variables: bool,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(scan_path)?;
    if verbose > 0 {
        eprintln!("Inspecting {}...", scan_path);
    }

    let (session, report) = inspect_scan(&json, options)?;
    print!("{}", format_inspection(&session, &report));

    if variables {
        println!();
        print!("{}", session.variables_block());
    }
    Ok(())
}

/// Human-readable summary of a presented session.
pub fn format_inspection(session: &InspectorSession, report: &IngestReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== Scan: {} elements, {} source nodes ({}) ===",
        report.element_count,
        report.node_count,
        short_fingerprint(&report.source_fingerprint)
    );
    if let Some(page) = &report.page_name {
        let _ = writeln!(out, "Page: {}", page);
    }
    if let Some(notice) = &report.notice {
        let _ = writeln!(out, "[NOTICE] {}: {}", notice.title, notice.message);
    }

    let _ = writeln!(out, "\nElements:");
    for el in session.store().active_elements() {
        let _ = writeln!(
            out,
            "  #{:02} [{}] {}  {}  {}",
            el.id.0 + 1,
            el.strategy.badge(),
            el.display_name,
            el.locator_expression,
            el.bounds.map(|b| format_rect(&b)).unwrap_or_else(|| "-".to_string())
        );
    }

    let tree = session.tree();
    let reconciliation = tree.reconciliation();
    let _ = writeln!(
        out,
        "\nReconciliation ({} of {} nodes matched):",
        reconciliation.matched_count(),
        session.source().len()
    );
    for (node, element) in &reconciliation.by_node {
        let tag = session
            .source()
            .get(*node)
            .map(|n| n.tag.as_str())
            .unwrap_or("?");
        let _ = writeln!(out, "  node {:>3} <{}> -> #{:02}", node.0, tag, element.0 + 1);
    }

    if let Some(selected) = session.store().selected() {
        let _ = writeln!(out, "\nSelected: #{:02}", selected.0 + 1);

        let overlay = session.overlay();
        match overlay.box_for(selected) {
            Some(b) => {
                let placed = b.position.map(|p| format_rect(&p)).unwrap_or_else(|| "unplaced".to_string());
                let _ = writeln!(out, "  overlay: box {} at {}{}", b.label, placed, if b.active { " [active]" } else { "" });
            }
            None => {
                let _ = writeln!(out, "  overlay: no box");
            }
        }

        let list = session.list();
        match list.row_for(selected) {
            Some(row) => {
                let scrolled = list.scrolled_to() == Some(selected);
                let _ = writeln!(
                    out,
                    "  list: row {}{}{}",
                    row.index_label,
                    if row.active { " [active]" } else { "" },
                    if scrolled { " [scrolled into view]" } else { "" }
                );
            }
            None => {
                let _ = writeln!(out, "  list: no row");
            }
        }

        match tree.active_node() {
            Some(node) => {
                let scrolled = tree.scrolled_to() == Some(node);
                let _ = writeln!(
                    out,
                    "  tree: node {}{}",
                    node.0,
                    if scrolled { " [scrolled into view]" } else { "" }
                );
            }
            None => {
                let _ = writeln!(out, "  tree: no matching node");
            }
        }
    }

    out
}

fn format_rect(r: &Rect) -> String {
    format!("({:.0},{:.0} {:.0}x{:.0})", r.x, r.y, r.w, r.h)
}

fn short_fingerprint(fp: &str) -> &str {
    fp.get(..12).unwrap_or(fp)
}

// ============================================================================
// compile subcommand
// ============================================================================

/// Load a step log. `.json` files are read as JSON, everything else as YAML.
pub fn load_steps(path: &str) -> Result<Vec<Step>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let steps = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(steps)
}

/// Compile the step log into one file per dialect. Returns the written paths.
pub fn cmd_compile(
    steps_path: &str,
    dialects: &[Dialect],
    output_dir: &str,
    name: &str,
    verbose: u8,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let steps = load_steps(steps_path)?;
    if steps.is_empty() {
        eprintln!("Step log {} is empty; writing script shells only", steps_path);
    }

    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for artifact in export(&steps, dialects, &sanitize_filename(name)) {
        let path = Path::new(output_dir).join(&artifact.file_name);
        std::fs::write(&path, &artifact.text)?;
        info!(path = %path.display(), dialect = %artifact.dialect, "script written");
        if verbose > 0 {
            eprintln!("  Wrote: {}", path.display());
        }
        written.push(path);
    }

    println!("Compiled {} steps into {} script(s) in {}/", steps.len(), written.len(), output_dir);
    Ok(written)
}

// ============================================================================
// Helpers
// ============================================================================

/// Sanitize a script name into a safe filename.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .to_lowercase()
}
