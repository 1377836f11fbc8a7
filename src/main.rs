use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use hexpaper::export::{self, ExportMode, OutputFormat};
use hexpaper::{Config, Error, HexGrid, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Printable hex-grid sheets for tabletop maps
#[derive(Parser, Debug)]
#[command(name = "hexpaper", version)]
#[command(about = "Render an A4 hex-grid sheet to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Start from a built-in preset instead of the defaults
    #[arg(short, long, value_name = "NAME", conflicts_with = "config")]
    preset: Option<String>,

    /// Override one setting, e.g. `map_width=12` or `coords.prefix=#`
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Output file path (extension determines format: .svg, .png or .pdf;
    /// none means .png)
    #[arg(short, long, value_name = "OUTPUT", default_value = "hexmap.png")]
    output: PathBuf,

    /// Color handling for SVG and PNG output; PDF is always `color`
    #[arg(short, long, value_enum, default_value_t = ExportMode::Color)]
    mode: ExportMode,

    /// Render at the size of a WIDTHxHEIGHT preview pane instead of 300 DPI
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_pane)]
    preview: Option<(f64, f64)>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// List built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn parse_pane(raw: &str) -> std::result::Result<(f64, f64), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", raw))?;
    let w = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let h = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    Ok((w, h))
}

fn main() -> std::result::Result<(), String> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hexpaper=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Args::parse()).map_err(|e| e.to_string())
}

fn run(args: Args) -> Result<()> {
    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "hexpaper", &mut std::io::stdout());
        return Ok(());
    }

    if args.list_presets {
        for name in Config::list_builtins() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = load_config(&args)?;

    if args.dump_config {
        let text = toml::to_string_pretty(&config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        print!("{}", text);
        return Ok(());
    }

    let grid = HexGrid::new(&config);
    tracing::info!(
        hexes = grid.count(),
        width = grid.map_width(),
        height = grid.map_height(),
        "hex map ready"
    );

    write_output(&config, &args)
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Config::from_path(path)?
        }
        (None, Some(name)) => Config::from_builtin(name)?,
        (None, None) => Config::default(),
    };

    for raw in &args.overrides {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("Expected KEY=VALUE, got `{}`", raw)))?;
        config.apply_override(key.trim(), value)?;
    }

    Ok(config.normalize())
}

fn write_output(config: &Config, args: &Args) -> Result<()> {
    let output = match args.output.extension() {
        Some(_) => args.output.clone(),
        None => export::build_filename(&args.output.to_string_lossy(), "png"),
    };
    let format = OutputFormat::from_path(&output)?;

    if format == OutputFormat::Pdf {
        if args.mode != ExportMode::Color {
            tracing::warn!(mode = ?args.mode, "PDF export always uses color mode");
        }
        if args.preview.is_some() {
            tracing::warn!("PDF export always renders at 300 DPI, ignoring --preview");
        }
    }

    let (width, height) = format.render_size(config, args.preview)?;
    std::fs::write(&output, format.encode(config, args.mode, (width, height))?)?;

    tracing::info!(path = %output.display(), ?format, width, height, "saved");
    Ok(())
}
