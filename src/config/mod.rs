pub mod settings;

pub use settings::{
    AnalyzerSettings, AppSettings, SceneSettings, SettingsError, UploadSettings,
    config_path, load_settings,
};
