use env_logger::{Builder, Env};

/// Loads `.env` if present and initializes the logger with a default filter of `info`.
pub fn setup_env() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
