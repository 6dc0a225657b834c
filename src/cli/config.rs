use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::compiler::compiler::Dialect;
use crate::error::CoreError;
use crate::geometry::rect::Size;
use crate::scan::matcher::DEFAULT_TOLERANCE;
use crate::selection::session::ViewMode;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "red-pather",
    version,
    about = "Inspect mobile screen scans and compile recorded steps into test scripts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: red-pather.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile a scan payload and show the three views
    Inspect {
        /// Scan payload JSON file
        #[arg(long)]
        scan: String,

        /// Rendering viewport as WIDTHxHEIGHT (default: device size)
        #[arg(long)]
        viewport: Option<String>,

        /// Element to select after presenting, by its listed number (#01 is 1)
        #[arg(long)]
        select: Option<usize>,

        /// Visible side panel: list or source
        #[arg(long, default_value = "list")]
        view: String,

        /// Matcher tolerance in device pixels
        #[arg(long)]
        tolerance: Option<f64>,

        /// Append a JSONL session trace to this file
        #[arg(long)]
        trace: Option<String>,

        /// Print the *** Variables *** block for the scan
        #[arg(long, default_value_t = false)]
        variables: bool,
    },

    /// Compile a recorded step log into test scripts
    Compile {
        /// Step log (YAML or JSON)
        #[arg(long)]
        steps: String,

        /// Dialect: declarative, imperative or all
        #[arg(long)]
        dialect: Option<String>,

        /// Output directory for the scripts
        #[arg(short, long)]
        output_dir: Option<String>,

        /// File stem for the scripts
        #[arg(long)]
        name: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `red-pather.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Zero means "use the device size".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewportConfig {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_script_name")]
    pub script_name: String,

    #[serde(default = "default_dialects")]
    pub dialects: Vec<Dialect>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            script_name: default_script_name(),
            dialects: default_dialects(),
        }
    }
}

// Serde default helpers
fn default_tolerance() -> f64 { DEFAULT_TOLERANCE }
fn default_output_dir() -> String { ".".to_string() }
fn default_script_name() -> String { "test".to_string() }
fn default_dialects() -> Vec<Dialect> { Dialect::ALL.to_vec() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("red-pather.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Argument resolution (CLI > config > defaults)
// ============================================================================

/// Parse `WIDTHxHEIGHT`.
pub fn parse_viewport(value: &str) -> Result<Size, CoreError> {
    let invalid = || CoreError::InvalidViewport(value.to_string());
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let w: f64 = w.trim().parse().map_err(|_| invalid())?;
    let h: f64 = h.trim().parse().map_err(|_| invalid())?;
    if w < 0.0 || h < 0.0 {
        return Err(invalid());
    }
    Ok(Size::new(w, h))
}

pub fn resolve_viewport(arg: Option<&str>, config: &AppConfig) -> Result<Size, CoreError> {
    match arg {
        Some(value) => parse_viewport(value),
        None => Ok(Size::new(config.viewport.width, config.viewport.height)),
    }
}

/// `all` selects both dialects; no argument defers to the config.
pub fn resolve_dialects(arg: Option<&str>, config: &AppConfig) -> Result<Vec<Dialect>, String> {
    match arg {
        None => Ok(config.export.dialects.clone()),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(Dialect::ALL.to_vec()),
        Some(s) => s.parse::<Dialect>().map(|d| vec![d]),
    }
}

pub fn parse_view_mode(s: &str) -> Result<ViewMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "list" => Ok(ViewMode::List),
        "source" | "tree" => Ok(ViewMode::Source),
        other => Err(format!("unknown view '{}', expected list or source", other)),
    }
}
