use std::path::PathBuf;

use clap::Parser;

/// Hosting options for the dashboard process.
#[derive(Debug, Clone, Parser)]
#[command(name = "student-dashboard")]
#[command(about = "Jaya Jaya Institut student outcomes dashboard", long_about = None)]
pub struct Config {
    /// Semicolon-delimited student outcomes file
    #[arg(long, default_value = "data/data.csv")]
    pub data: PathBuf,

    /// Classifier artifact (JSON logistic regression)
    #[arg(long, default_value = "model/dropout_model.json")]
    pub model: PathBuf,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_files() {
        let config = Config::try_parse_from(["student-dashboard"]).unwrap();
        assert_eq!(config.data, PathBuf::from("data/data.csv"));
        assert_eq!(config.model, PathBuf::from("model/dropout_model.json"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.log_json);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "student-dashboard",
            "--data",
            "/srv/students.csv",
            "--port",
            "9000",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("/srv/students.csv"));
        assert_eq!(config.port, 9000);
        assert!(config.log_json);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["student-dashboard", "--port", "http"]).is_err());
    }
}
