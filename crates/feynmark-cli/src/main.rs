use feynmark_core::geom::{point, vector};
use feynmark_core::{
    CubicBezier, DecorationConfig, Definition, DefsStore, GenerationOptions, Orientation, Particle,
    VertexLocation, VertexStyle,
};
use feynmark_render::SvgRenderOptions;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Feynmark(feynmark_core::Error),
    Render(feynmark_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Feynmark(err) => write!(f, "{err}"),
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

impl From<feynmark_core::Error> for CliError {
    fn from(value: feynmark_core::Error) -> Self {
        Self::Feynmark(value)
    }
}

impl From<feynmark_render::Error> for CliError {
    fn from(value: feynmark_render::Error) -> Self {
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
    Plan,
    Render,
    Annotate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    scale: Option<f64>,
    offset: Option<(f64, f64)>,
    out: Option<String>,
    config: Option<String>,
    curve: Option<CubicBezier>,
    svg: bool,
    particle: Option<Particle>,
    amplitude: Option<f64>,
    vertex_style: Option<VertexStyle>,
    vertex_size: Option<f64>,
    vertex_location: Option<VertexLocation>,
    arrow: Option<Orientation>,
    momentum_arrow: Option<Orientation>,
    momentum_offset: Option<f64>,
    momentum_length: Option<f64>,
    momentum_label: Option<String>,
    label_typeset: bool,
}

#[derive(Serialize)]
struct DefinitionOut<'a> {
    id: &'a str,
    #[serde(flatten)]
    definition: &'a Definition,
}

#[derive(Serialize)]
struct PlanOut<'a, T: Serialize> {
    #[serde(flatten)]
    plan: &'a T,
    definitions: Vec<DefinitionOut<'a>>,
}

fn usage() -> &'static str {
    "feynmark-cli\n\
\n\
USAGE:\n\
  feynmark-cli [plan] [--pretty] [--out <path>] [--scale <n>] [--offset <x,y>] [--config <json>] [<path>|-]\n\
  feynmark-cli render [--out <path>] [--scale <n>] [--offset <x,y>] [--config <json>] [<path>|-]\n\
  feynmark-cli annotate --curve <x0,y0,x1,y1,x2,y2,x3,y3> [--p-type <particle>] [--amplitude <n>] [--v-style <style>] [--v-size <n>] [--v-location <loc>] [--arrow-type <dir>] [--momentum-arrow <dir>] [--momentum-offset <n>] [--momentum-length <n>] [--momentum-label <text>] [--label-latex] [--config <json>] [--svg] [--pretty] [--out <path>]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', diagram JSON is read from stdin.\n\
  - plan prints the decoration plan and its shared definitions as JSON.\n\
  - --out writes the JSON or SVG output to a file instead of stdout.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - --config overlays a JSON object onto the default decoration settings.\n\
  - Set RUST_LOG=debug to see skipped decorations on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next()
        .map(String::as_str)
        .ok_or(CliError::Usage(usage()))
}

fn parse_number(text: &str) -> Result<f64, CliError> {
    let v = text
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::Usage(usage()))?;
    if !v.is_finite() {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_numbers(text: &str, count: usize) -> Result<Vec<f64>, CliError> {
    let values = text
        .split(',')
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != count {
        return Err(CliError::Usage(usage()));
    }
    Ok(values)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "plan" => args.command = Command::Plan,
            "render" => args.command = Command::Render,
            "annotate" => args.command = Command::Annotate,
            "--pretty" => args.pretty = true,
            "--svg" => args.svg = true,
            "--label-latex" => args.label_typeset = true,
            "--scale" => {
                let scale = parse_number(next_value(&mut it)?)?;
                if scale <= 0.0 {
                    return Err(CliError::Usage(usage()));
                }
                args.scale = Some(scale);
            }
            "--offset" => {
                let v = parse_numbers(next_value(&mut it)?, 2)?;
                args.offset = Some((v[0], v[1]));
            }
            "--curve" => {
                let v = parse_numbers(next_value(&mut it)?, 8)?;
                args.curve = Some(CubicBezier::new(
                    point(v[0], v[1]),
                    point(v[2], v[3]),
                    point(v[4], v[5]),
                    point(v[6], v[7]),
                ));
            }
            "--out" => args.out = Some(next_value(&mut it)?.to_string()),
            "--config" => args.config = Some(next_value(&mut it)?.to_string()),
            "--p-type" => args.particle = Some(Particle::from_tag(next_value(&mut it)?)),
            "--amplitude" => args.amplitude = Some(parse_number(next_value(&mut it)?)?),
            "--v-style" => args.vertex_style = Some(VertexStyle::from_tag(next_value(&mut it)?)),
            "--v-size" => args.vertex_size = Some(parse_number(next_value(&mut it)?)?),
            "--v-location" => {
                args.vertex_location = Some(VertexLocation::from_tag(next_value(&mut it)?));
            }
            "--arrow-type" => args.arrow = Some(Orientation::from_tag(next_value(&mut it)?)),
            "--momentum-arrow" => {
                args.momentum_arrow = Some(Orientation::from_tag(next_value(&mut it)?));
            }
            "--momentum-offset" => {
                args.momentum_offset = Some(parse_number(next_value(&mut it)?)?);
            }
            "--momentum-length" => {
                args.momentum_length = Some(parse_number(next_value(&mut it)?)?);
            }
            "--momentum-label" => args.momentum_label = Some(next_value(&mut it)?.to_string()),
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
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Annotate) && args.curve.is_none() {
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

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
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

fn definitions(defs: &DefsStore) -> Vec<DefinitionOut<'_>> {
    defs.iter()
        .map(|(id, definition)| DefinitionOut { id, definition })
        .collect()
}

/// Defaults, then `--config`, then individual flags.
fn decoration_config(args: &Args) -> Result<DecorationConfig, CliError> {
    let mut config = DecorationConfig::default();
    if let Some(raw) = &args.config {
        let overrides: Value = serde_json::from_str(raw)?;
        config = config.overlay_json(&overrides)?;
    }
    if let Some(particle) = args.particle {
        config = config.with_particle(particle);
    }
    if let Some(amplitude) = args.amplitude {
        config = config.with_amplitude(amplitude);
    }
    if args.vertex_style.is_some() || args.vertex_location.is_some() {
        let style = args.vertex_style.unwrap_or(config.vertex_style);
        let location = args.vertex_location.unwrap_or(config.vertex_location);
        config = config.with_vertex(style, location);
    }
    if let Some(size) = args.vertex_size {
        config = config.with_vertex_size(size);
    }
    if let Some(arrow) = args.arrow {
        config = config.with_arrow(arrow);
    }
    if let Some(arrow) = args.momentum_arrow {
        config = config.with_momentum_arrow(arrow);
    }
    if let Some(offset) = args.momentum_offset {
        config = config.with_momentum_offset(offset);
    }
    if let Some(length) = args.momentum_length {
        config = config.with_momentum_length(length);
    }
    if let Some(label) = &args.momentum_label {
        config = config.with_momentum_label(label.clone());
    }
    if args.label_typeset {
        config = config.with_label_typeset(true);
    }
    Ok(config)
}

fn generation_options(args: &Args) -> Result<GenerationOptions, CliError> {
    let mut options = GenerationOptions::default().with_base(decoration_config(args)?);
    if let Some(scale) = args.scale {
        options = options.with_scale(scale);
    }
    if let Some((x, y)) = args.offset {
        options = options.with_offset(vector(x, y));
    }
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let mut defs = DefsStore::new();

    match args.command {
        Command::Plan | Command::Render => {
            let options = generation_options(&args)?;
            let text = read_input(args.input.as_deref())?;
            let plan = feynmark_core::generate_from_json(&text, &options, &mut defs)?;
            tracing::debug!(
                edges = plan.edges.len(),
                definitions = defs.len(),
                "diagram planned"
            );

            if matches!(args.command, Command::Render) {
                let svg = feynmark_render::render_diagram_svg(
                    &plan,
                    &defs,
                    &SvgRenderOptions::default(),
                )?;
                return write_text(&svg, args.out.as_deref());
            }
            write_json(
                &PlanOut {
                    plan: &plan,
                    definitions: definitions(&defs),
                },
                args.pretty,
                args.out.as_deref(),
            )
        }
        Command::Annotate => {
            let Some(curve) = args.curve else {
                return Err(CliError::Usage(usage()));
            };
            let config = decoration_config(&args)?;
            let plan = feynmark_core::annotate(&curve, &config, &mut defs);
            if plan.is_empty() {
                tracing::debug!("annotation produced no decorations");
            }

            if args.svg {
                let svg = feynmark_render::render_annotation_svg(
                    &curve,
                    &plan,
                    &defs,
                    &SvgRenderOptions::default(),
                )?;
                return write_text(&svg, args.out.as_deref());
            }
            write_json(
                &PlanOut {
                    plan: &plan,
                    definitions: definitions(&defs),
                },
                args.pretty,
                args.out.as_deref(),
            )
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

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

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
