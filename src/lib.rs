#![warn(clippy::all, rust_2018_idioms)]

pub mod background;
pub mod canvas;
pub mod canvas_state;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod history;
pub mod id_generator;
pub mod input;
pub mod renderer;
pub mod shared;
pub mod stroke;
pub mod tools;

pub use background::{BackgroundImage, BackgroundRef};
pub use canvas::SketchCanvas;
pub use canvas_state::CanvasState;
pub use config::EngineConfig;
pub use error::{CanvasError, CanvasResult, ConfigError};
pub use event::{CanvasEvent, EventBus, EventHandler, HistoryStatus, SubscriptionId};
pub use export::{Snapshot, SnapshotExporter};
pub use history::HistoryStack;
pub use id_generator::StrokeId;
pub use input::{InputRouter, PointerEvent, PointerPhase};
pub use renderer::CanvasCompositor;
pub use shared::SharedCanvasState;
pub use stroke::{BlendMode, DrawSession, Point, Stroke, StrokeRef, Tool};
pub use tools::{StrokeCapture, StrokeCommit, ToolSelection};
