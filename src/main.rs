//! Replays a JSON gesture script through the canvas engine and writes the
//! exported PNG.
//!
//! ```text
//! sketch-replay <script.json> <out.png> [background-image]
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use sketch_canvas::{
    BackgroundImage, EngineConfig, PointerEvent, PointerPhase, SketchCanvas, Tool, ToolSelection,
};

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: EngineConfig,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Pointer {
        phase: PointerPhase,
        x: f32,
        y: f32,
    },
    Tool {
        tool: Tool,
        #[serde(default)]
        color: Option<[u8; 4]>,
        width: f32,
    },
    Undo,
    Redo,
    Clear,
}

fn run(
    script_path: PathBuf,
    out_path: PathBuf,
    background: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let script: Script = serde_json::from_str(&std::fs::read_to_string(&script_path)?)?;
    let mut canvas = SketchCanvas::new(script.config)?;

    // The loaded image must outlive the replay; the canvas only holds a weak handle.
    let _background = match background {
        Some(path) => {
            let image = BackgroundImage::decode(&std::fs::read(&path)?)?;
            canvas.load_background(image.handle());
            Some(image)
        }
        None => None,
    };

    for step in script.steps {
        match step {
            Step::Pointer { phase, x, y } => {
                canvas.handle_pointer(PointerEvent::new(phase, x, y));
            }
            Step::Tool { tool, color, width } => {
                let color =
                    color.map(|[r, g, b, a]| egui::Color32::from_rgba_unmultiplied(r, g, b, a));
                canvas.select_tool(ToolSelection { tool, color, width });
            }
            Step::Undo => {
                canvas.undo();
            }
            Step::Redo => {
                canvas.redo();
            }
            Step::Clear => canvas.clear(),
        }
    }
    // A script that stops mid-gesture still commits its last stroke.
    canvas.set_drawing_enabled(false);

    let snapshot = canvas.export_snapshot()?;
    std::fs::write(&out_path, snapshot.png())?;
    log::info!("Wrote {}", out_path.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: sketch-replay <script.json> <out.png> [background-image]");
        std::process::exit(1);
    }

    let script = PathBuf::from(&args[1]);
    let out = PathBuf::from(&args[2]);
    let background = args.get(3).map(PathBuf::from);

    if let Err(err) = run(script, out, background) {
        log::error!("Replay failed: {}", err);
        std::process::exit(1);
    }
}
