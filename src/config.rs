use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl CorsConfig {
    pub fn allow_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.server.bind.is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.cors.allowed_origins.is_empty() {
        anyhow::bail!("cors.allowed_origins must list at least one origin (use \"*\" for any)");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parses_minimal_config() {
        let f = write_config(
            r#"
[db]
path = "data/qrganize.sqlite"

[server]
bind = "127.0.0.1:8080"
"#,
        );
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(config.cors.allow_any_origin());
    }

    #[test]
    fn rejects_empty_bind() {
        let f = write_config(
            r#"
[db]
path = "data/qrganize.sqlite"

[server]
bind = ""
"#,
        );
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn explicit_origins_disable_wildcard() {
        let f = write_config(
            r#"
[db]
path = "data/qrganize.sqlite"

[server]
bind = "127.0.0.1:8080"

[cors]
allowed_origins = ["http://localhost:5173"]
"#,
        );
        let config = load_config(f.path()).unwrap();
        assert!(!config.cors.allow_any_origin());
    }
}
