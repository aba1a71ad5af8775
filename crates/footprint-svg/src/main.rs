use clap::Parser;
use footprint_svg::document::DEFAULT_SIZE;
use footprint_svg::{
    load, load_bytes, svg, to_svg_tree, ConvertError, InputFormat, RenderOptions, Side,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "footprint-svg", about = "Render a PCB footprint to SVG")]
struct Cli {
    /// Input footprint (.kicad_mod or .json)
    input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override auto-detected format (kicad, json)
    #[arg(short, long, value_parser = parse_format)]
    format: Option<InputFormat>,

    /// Board side to render (front, back)
    #[arg(long, default_value = "front", value_parser = parse_side)]
    side: Side,

    /// Edge length of the square output canvas
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: f64,

    /// Emit the element tree as JSON instead of SVG markup
    #[arg(long)]
    tree: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn parse_format(s: &str) -> Result<InputFormat, String> {
    match s.to_lowercase().as_str() {
        "kicad" | "kicad_mod" => Ok(InputFormat::KiCad),
        "json" => Ok(InputFormat::Json),
        _ => Err(format!("Unknown format: {s}. Use: kicad, json")),
    }
}

fn parse_side(s: &str) -> Result<Side, String> {
    s.parse()
}

fn run(cli: &Cli) -> Result<String, ConvertError> {
    let module = match cli.format {
        Some(format) => load_bytes(&std::fs::read(&cli.input)?, format)?,
        None => load(&cli.input)?,
    };

    let opts = RenderOptions {
        size: cli.size,
        side: cli.side,
    };
    let tree = to_svg_tree(&module, &opts)?;

    if cli.tree {
        let json = if cli.pretty {
            serde_json::to_string_pretty(&tree)?
        } else {
            serde_json::to_string(&tree)?
        };
        Ok(json)
    } else {
        Ok(svg::to_svg_string(&tree))
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let output = match run(&cli) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Some(output_path) = &cli.output {
        if let Err(e) = std::fs::write(output_path, &output) {
            eprintln!("Error writing {}: {e}", output_path.display());
            std::process::exit(1);
        }
        eprintln!("Written to {}", output_path.display());
    } else {
        println!("{output}");
    }
}
