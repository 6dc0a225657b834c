use clap::Parser;
use red_pather::cli::commands::{cmd_compile, cmd_inspect, InspectOptions};
use red_pather::cli::config::{
    load_config, parse_view_mode, resolve_dialects, resolve_viewport, Cli, Commands,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Resolve settings: CLI > config > defaults
    match cli.command {
        Commands::Inspect {
            scan,
            viewport,
            select,
            view,
            tolerance,
            trace,
            variables,
        } => {
            let options = InspectOptions {
                viewport: resolve_viewport(viewport.as_deref(), &config)?,
                select,
                view_mode: parse_view_mode(&view)?,
                tolerance: tolerance.unwrap_or(config.matcher.tolerance),
                trace,
            };
            cmd_inspect(&scan, &options, variables, cli.verbose)?;
        }
        Commands::Compile {
            steps,
            dialect,
            output_dir,
            name,
        } => {
            let dialects = resolve_dialects(dialect.as_deref(), &config)?;
            let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
            let name = name.unwrap_or_else(|| config.export.script_name.clone());
            cmd_compile(&steps, &dialects, &output_dir, &name, cli.verbose)?;
        }
    }

    Ok(())
}
