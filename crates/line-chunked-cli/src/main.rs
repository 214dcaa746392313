use line_chunked::render::{HeadlessError, SvgRenderOptions, sanitize_svg_id};
use line_chunked::{ChunkedLineOptions, parse_points};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Chunked(line_chunked::Error),
    Render(HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Chunked(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<line_chunked::Error> for CliError {
    fn from(value: line_chunked::Error) -> Self {
        Self::Chunked(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
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
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    width: Option<f64>,
    height: Option<f64>,
    clip_path_id: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "line-chunked-cli\n\
\n\
USAGE:\n\
  line-chunked-cli [layout] [--config <path>] [--pretty] [--out <path>] [<path>|-]\n\
  line-chunked-cli render [--config <path>] [--width <w>] [--height <h>] [--id <clip-path-id>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', points are read from stdin as a JSON array.\n\
  - --config reads chunked-line options (accessors, styles, curve) from a JSON file.\n\
  - layout prints the runs, paths and clip rectangles as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
"
}

fn parse_dimension(raw: Option<&String>) -> Result<f64, CliError> {
    let Some(raw) = raw else {
        return Err(CliError::Usage(usage()));
    };
    let value = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(value)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--width" => args.width = Some(parse_dimension(it.next())?),
            "--height" => args.height = Some(parse_dimension(it.next())?),
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.clip_path_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
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

fn read_options(config: Option<&str>) -> Result<ChunkedLineOptions, CliError> {
    match config {
        None => Ok(ChunkedLineOptions::default()),
        Some(path) => Ok(ChunkedLineOptions::from_json(&std::fs::read_to_string(
            path,
        )?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    write_text(&text, out)
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

fn run(args: Args) -> Result<(), CliError> {
    let options = read_options(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;
    let points = parse_points(&text)?;

    match args.command {
        Command::Layout => {
            let geometry = line_chunked::layout_json(&points, options)?;
            write_json(&geometry, args.pretty, args.out.as_deref())
        }
        Command::Render => {
            let svg_options = SvgRenderOptions {
                width: args.width,
                height: args.height,
                clip_path_id: args.clip_path_id.as_deref().map(sanitize_svg_id),
                ..Default::default()
            };
            let svg = line_chunked::render::render_svg(&points, options, &svg_options)?;
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
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
