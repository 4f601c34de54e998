pub mod domain;
pub mod model;

pub mod config {
    use std::path::PathBuf;

    pub const DEFAULT_MODEL_PATH: &str = "models/sales_pipeline_latest.json";
    pub const DEFAULT_LOG_FILE: &str = "app.log";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub model_path: PathBuf,
        pub log_file: PathBuf,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                model_path: path_var("MODEL_PATH", DEFAULT_MODEL_PATH),
                log_file: path_var("LOG_FILE", DEFAULT_LOG_FILE),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }
    }

    fn path_var(name: &str, default: &str) -> PathBuf {
        std::env::var(name)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default))
    }
}
