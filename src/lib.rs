// diagram3d: physics diagram to interactive 3D model

pub mod analyzer;
pub mod auth;
pub mod config;
pub mod model;
pub mod scene;
pub mod shell;
pub mod ui;
pub mod utils;

pub use analyzer::{AnalysisError, DiagramAnalyzer, GeminiClient, VisionClient};
pub use model::PhysicsModelData;
pub use shell::{AnalysisDispatcher, AppShell, ShellState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
