use spoke::raster::{RasterError, RasterOptions};
use spoke::{Chart, ChartDocument, ConfigOverrides, DocumentFormat, parse_overrides};
use spoke_render::RadarLayout;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Chart(spoke::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Chart(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<spoke::Error> for CliError {
    fn from(value: spoke::Error) -> Self {
        Self::Chart(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Layout,
    Frame,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    configs: Vec<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    at: f64,
    out: Option<String>,
}

fn usage() -> &'static str {
    "spoke-cli\n\
\n\
USAGE:\n\
  spoke-cli layout [--pretty] [--config <file>]... [<path>|-]\n\
  spoke-cli [render] [--format svg|png] [--scale <n>] [--background <color>] [--config <file>]... [--out <path>] [<path>|-]\n\
  spoke-cli frame --at <seconds> [--config <file>]... [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the chart document is read from stdin.\n\
  - Documents and --config files are YAML, or JSON when the name ends in .json.\n\
  - --config layers apply after the document's own `config` block, in order.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - frame samples the animated reveal <seconds> after it starts.\n\
  - Set RUST_LOG (e.g. RUST_LOG=spoke_render=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };
    let mut saw_at = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "frame" => args.command = Command::Frame,
            "--pretty" => args.pretty = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--at" => {
                let Some(at) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.at = at.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.at.is_finite() && args.at >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                saw_at = true;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.configs.push(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Frame) && !saw_at {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn input_format(input: Option<&str>, text: &str) -> DocumentFormat {
    match input {
        Some(path) if path != "-" => DocumentFormat::from_path(Path::new(path)),
        _ => DocumentFormat::sniff(text),
    }
}

fn load_chart(args: &Args) -> Result<Chart, CliError> {
    let text = read_input(args.input.as_deref())?;
    let doc = ChartDocument::parse(&text, input_format(args.input.as_deref(), &text))?;

    let mut layers: Vec<ConfigOverrides> = Vec::with_capacity(args.configs.len());
    for path in &args.configs {
        let text = std::fs::read_to_string(path)?;
        layers.push(parse_overrides(&text, DocumentFormat::from_path(Path::new(path)))?);
    }
    tracing::debug!(
        groups = doc.groups.len(),
        datasets = doc.datasets.len(),
        layers = layers.len(),
        "loaded chart document"
    );
    Ok(Chart::from_document(&doc, &layers)?)
}

fn write_layout(layout: &RadarLayout, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), layout)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), layout)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let chart = load_chart(&args)?;
    match args.command {
        Command::Layout => write_layout(&chart.layout()?, args.pretty),
        Command::Frame => write_text(&chart.frame_at(args.at)?, args.out.as_deref()),
        Command::Render => match args.render_format {
            RenderFormat::Svg => write_text(&chart.render_svg()?, args.out.as_deref()),
            RenderFormat::Png => {
                let mut options = RasterOptions {
                    scale: args.render_scale,
                    ..RasterOptions::default()
                };
                if args.background.is_some() {
                    options.background = args.background.clone();
                }
                let bytes = chart.render_png(&options)?;
                let out = args
                    .out
                    .as_deref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| default_raster_out_path(args.input.as_deref(), "png"));
                std::fs::write(&out, bytes)?;
                tracing::debug!(path = %out.display(), "wrote PNG");
                Ok(())
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
