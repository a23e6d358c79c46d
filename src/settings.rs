use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Built single-page client, served for paths no route matches.
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CorsSettings {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Defaults, then the TOML file at `path` if it exists, then `TRIVIA__*` variables.
///
/// `TRIVIA__DATABASE__PATH=/tmp/t.db` overrides `database.path`;
/// `TRIVIA__CORS__ALLOWED_ORIGINS` takes a comma separated list.
pub fn get_settings(path: &Path) -> Result<Settings, ConfigError> {
    load_settings(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix("TRIVIA")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

fn load_settings(path: &Path, environment: Environment) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.path", "trivia.db")?
        .set_default("database.max_connections", 5)?
        .set_default("cors.allowed_origins", vec!["*"])?
        .add_source(File::from(path).required(false))
        .add_source(environment)
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = get_settings(Path::new("does/not/exist.toml")).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.max_connections, 5);
        assert!(settings.cors.allows_any_origin());
        assert!(settings.server.static_dir.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 5000
static_dir = "frontend/build"

[cors]
allowed_origins = ["http://localhost:3000"]
"#
        )
        .unwrap();

        let settings = get_settings(file.path()).unwrap();

        assert_eq!(settings.server.address(), "127.0.0.1:5000");
        assert_eq!(
            settings.server.static_dir,
            Some(PathBuf::from("frontend/build"))
        );
        assert!(!settings.cors.allows_any_origin());
        assert_eq!(settings.database.path, "trivia.db");
    }

    fn variables(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 5000

[database]
path = "from-file.db"
"#
        )
        .unwrap();
        let env = environment().source(Some(variables(&[
            ("TRIVIA__SERVER__PORT", "9090"),
            ("TRIVIA__DATABASE__PATH", "/tmp/trivia-env.db"),
            ("TRIVIA__DATABASE__MAX_CONNECTIONS", "2"),
            ("OTHER__SERVER__PORT", "1"),
        ])));

        let settings = load_settings(file.path(), env).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.database.path, "/tmp/trivia-env.db");
        assert_eq!(settings.database.max_connections, 2);
    }

    #[test]
    fn allowed_origins_split_on_commas() {
        let env = environment().source(Some(variables(&[(
            "TRIVIA__CORS__ALLOWED_ORIGINS",
            "http://localhost:3000,https://trivia.example.com",
        )])));

        let settings = load_settings(Path::new("does/not/exist.toml"), env).unwrap();

        assert_eq!(
            settings.cors.allowed_origins,
            vec!["http://localhost:3000", "https://trivia.example.com"]
        );
        assert!(!settings.cors.allows_any_origin());
    }
}
