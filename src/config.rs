use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Carenote";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model the default recommendation prompt was written against.
pub const DEFAULT_RECOMMENDATION_MODEL: &str = "llama2";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Per-call budget for recommendation generation. Generation is the only
/// operation allowed to block for long; everything else is a local query.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Get the application data directory (~/Carenote on all platforms)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Carenote")
}

/// Path of the SQLite database file
pub fn database_path() -> PathBuf {
    app_data_dir().join("carenote.db")
}

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Ollama endpoint, overridable via CARENOTE_OLLAMA_URL
pub fn ollama_base_url() -> String {
    std::env::var("CARENOTE_OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string())
}

/// Recommendation model, overridable via CARENOTE_MODEL
pub fn recommendation_model() -> String {
    std::env::var("CARENOTE_MODEL")
        .unwrap_or_else(|_| DEFAULT_RECOMMENDATION_MODEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Carenote"));
    }

    #[test]
    fn database_path_under_app_data() {
        let path = database_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("carenote.db"));
    }

    #[test]
    fn app_name_is_carenote() {
        assert_eq!(APP_NAME, "Carenote");
    }

    #[test]
    fn log_filter_scoped_to_crate() {
        assert_eq!(default_log_filter(), "carenote=info");
    }
}
