#![deny(unsafe_code)]
//! CLI binary for the wheels generative sketch.
//!
//! Subcommands:
//! - `render` runs a sketch for N frames and writes the last one as PNG
//! - `layout` prints one generation pass as a table (or JSON)
//! - `list` prints available variants and palettes

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use std::path::{Path, PathBuf};
use std::process;
use wheels_core::{DisplayList, InputEvent, Palette, ScheduledEvent, Script, Sketch, Variant};

#[derive(Parser)]
#[command(name = "wheels", about = "Generative wheel motif sketch")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that builds a sketch.
#[derive(Args)]
struct SketchArgs {
    /// Sketch variant (basic, interactive, enhanced).
    #[arg(short, long, default_value = "enhanced")]
    variant: String,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f64,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Tuning overrides as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run a sketch for N frames and write the last one as PNG.
    Render {
        #[command(flatten)]
        sketch: SketchArgs,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 60)]
        frames: usize,

        /// Palette name (meadow, coral, dusk, desert, harbor).
        #[arg(short, long)]
        palette: Option<String>,

        /// Pointer position as "x,y", held for the whole run.
        #[arg(long)]
        pointer: Option<String>,

        /// Replay a JSON script instead of using the sketch options.
        #[arg(long, conflicts_with_all = ["palette", "pointer"])]
        script: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "wheels.png")]
        output: PathBuf,
    },
    /// Generate one layout and print it as JSON.
    Layout {
        #[command(flatten)]
        sketch: SketchArgs,
    },
    /// List available variants and palettes.
    List,
}

impl SketchArgs {
    fn to_script(&self) -> Result<Script, CliError> {
        let variant = Variant::from_name(&self.variant)?;
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        let mut script = Script::new(variant, self.width, self.height, self.seed);
        script.params = params;
        Ok(script)
    }
}

/// Parses `"x,y"` into a pointer move event.
fn parse_pointer(text: &str) -> Result<InputEvent, CliError> {
    let bad = || CliError::Input(format!("invalid --pointer '{text}', expected x,y"));
    let (x, y) = text.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    Ok(InputEvent::PointerMove { x, y })
}

fn read_script(path: &Path) -> Result<Script, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid script {}: {e}", path.display())))
}

/// Human-readable layout: a summary line, then one row per motif.
fn layout_table(sketch: &Sketch) -> String {
    let stats = sketch.layout_stats();
    let extent = sketch.extent();
    let mut out = format!(
        "{} {}x{}: placed {}/{} motifs ({} skipped, {} rejected samples)\n",
        sketch.variant().name(),
        extent.width(),
        extent.height(),
        stats.placed,
        stats.requested,
        stats.skipped,
        stats.rejected_samples
    );
    out.push_str(&format!(
        "{:>3}  {:>8}  {:>8}  {:>7}  {:>7}  {:<8}  {}\n",
        "#", "x", "y", "size", "speed", "pattern", "palette"
    ));
    for (i, m) in sketch.motifs().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:>8.1}  {:>8.1}  {:>7.1}  {:>7.2}  {:<8}  {}\n",
            i,
            m.position.x,
            m.position.y,
            m.base_size,
            m.rotation_speed,
            format!("{:?}", m.pattern).to_lowercase(),
            m.palette.name()
        ));
    }
    out
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let palettes = Palette::list_names();
            if cli.json {
                let variants: Vec<_> = Variant::ALL
                    .iter()
                    .map(|v| serde_json::json!({"name": v.name(), "description": v.description()}))
                    .collect();
                let info = serde_json::json!({
                    "variants": variants,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Variants:");
                for v in Variant::ALL {
                    println!("  {:<12} {}", v.name(), v.description());
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Layout { sketch } => {
            let script = sketch.to_script()?;
            let built = script.build()?;
            if cli.json {
                let info = serde_json::json!({
                    "variant": built.variant(),
                    "width": script.width,
                    "height": script.height,
                    "seed": script.seed,
                    "stats": built.layout_stats(),
                    "motifs": built.motifs(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print!("{}", layout_table(&built));
            }
        }
        Command::Render {
            sketch,
            frames,
            palette,
            pointer,
            script,
            output,
        } => {
            let script = match script {
                Some(path) => read_script(&path)?,
                None => {
                    let mut script = sketch.to_script()?;
                    script.frames = frames;
                    script.palette = palette;
                    if let Some(text) = pointer {
                        script.events.push(ScheduledEvent {
                            frame: 0,
                            event: parse_pointer(&text)?,
                        });
                    }
                    script
                }
            };

            let mut list = DisplayList::new(script.extent()?);
            let (finished, actions) = script.run(&mut list)?;
            log::debug!("script produced {} actions", actions.len());

            wheels_raster::snapshot::render_png(&list, &output)?;

            let stats = finished.layout_stats();
            if cli.json {
                let info = serde_json::json!({
                    "variant": finished.variant(),
                    "width": script.width,
                    "height": script.height,
                    "frames": script.frames,
                    "seed": script.seed,
                    "palette": finished.active_palette().name(),
                    "motifs": stats.placed,
                    "skipped": stats.skipped,
                    "actions": actions,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}, {} motifs) -> {}",
                    finished.variant().name(),
                    script.width,
                    script.height,
                    script.frames,
                    script.seed,
                    stats.placed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn args(variant: &str, params: &str) -> SketchArgs {
        SketchArgs {
            variant: variant.to_string(),
            width: 800.0,
            height: 600.0,
            seed: 1,
            params: params.to_string(),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_pointer_accepts_pairs() {
        assert_eq!(
            parse_pointer("120, 45.5").unwrap(),
            InputEvent::PointerMove { x: 120.0, y: 45.5 }
        );
    }

    #[test]
    fn parse_pointer_rejects_garbage() {
        for text in ["", "12", "a,b", "1,2,3"] {
            assert_eq!(parse_pointer(text).unwrap_err().exit_code(), 12, "{text}");
        }
    }

    #[test]
    fn to_script_maps_unknown_variant_to_sketch_error() {
        let err = args("deluxe", "{}").to_script().unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn to_script_rejects_bad_params_json() {
        let err = args("basic", "{nope").to_script().unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn read_script_reports_missing_file_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_script(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn read_script_parses_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{"variant": "basic", "width": 400, "height": 300, "seed": 9, "frames": 2,
                "events": [{"frame": 1, "event": {"type": "key", "key": "c"}}]}"#,
        )
        .unwrap();
        let script = read_script(&path).unwrap();
        assert_eq!(script.variant, Variant::Basic);
        assert_eq!(script.events.len(), 1);
    }

    #[test]
    fn layout_table_has_a_row_per_motif() {
        let sketch = args("basic", "{}").to_script().unwrap().build().unwrap();
        let table = layout_table(&sketch);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2 + sketch.motifs().len());
        assert!(lines[0].starts_with("basic 800x600: placed"));
        assert!(lines[1].contains("pattern"));
        assert!(lines[2].contains("standard"));
    }

    #[test]
    fn render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let cli = Cli::parse_from([
            "wheels",
            "render",
            "--frames",
            "3",
            "--pointer",
            "400,300",
            "-o",
            output.to_str().unwrap(),
        ]);
        run(cli).unwrap();
        assert!(output.exists());
    }
}
