//! Endpoint discovery from the control service's environment file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use url::Url;

use crate::error::Result;

/// Location of the environment file, relative to the project root
pub const ENV_FILE: [&str; 3] = ["javascript", "mcpServer", ".env"];

const PORT_KEY: &str = "MCP_HTTP_PORT";
const HOST_KEY: &str = "MCP_HTTP_HOST";
const TOKEN_KEY: &str = "MCP_API_TOKEN";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_HOST: &str = "localhost";
/// Wildcard bind address; clients must dial loopback instead
const ANY_HOST: &str = "0.0.0.0";

/// Absolute path of the environment file inside `project`
pub fn env_file_path(project: &Path) -> PathBuf {
    ENV_FILE.iter().fold(project.to_path_buf(), |p, s| p.join(s))
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped. Keys and values are trimmed and
/// the value keeps everything after the first `=`.
pub fn parse_env(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Where and how to reach the control service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpConfig {
    pub base_url: Url,
    pub token: String,
}

impl McpConfig {
    /// Build a config from parsed environment entries, applying defaults
    pub fn from_env(vars: &HashMap<String, String>) -> Result<Self> {
        let port = match vars.get(PORT_KEY).filter(|raw| !raw.is_empty()) {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid {}, using {}", PORT_KEY, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let host = match vars.get(HOST_KEY).map(String::as_str) {
            None | Some("") | Some(ANY_HOST) => DEFAULT_HOST,
            Some(host) => host,
        };

        let base_url = Url::parse(&format!("http://{}:{}", host, port))?;
        let token = vars.get(TOKEN_KEY).cloned().unwrap_or_default();

        Ok(Self { base_url, token })
    }

    /// Read the environment file of `project`.
    ///
    /// Returns `Ok(None)` if the project has no control service configured.
    pub fn discover(project: &Path) -> Result<Option<Self>> {
        let path = env_file_path(project);
        if !path.is_file() {
            debug!(path = %path.display(), "No control service env file");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_env(&parse_env(&content)).map(Some)
    }

    /// Whether a non-empty bearer token is present
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_env_skips_comments() {
        let parsed = parse_env(
            "# control service\n\nMCP_HTTP_PORT = 4000\nMCP_API_TOKEN=abc=def\nnoequals\n=orphan\n",
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["MCP_HTTP_PORT"], "4000");
        assert_eq!(parsed["MCP_API_TOKEN"], "abc=def");
    }

    #[test]
    fn test_defaults() {
        let config = McpConfig::from_env(&HashMap::new()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3001/");
        assert!(!config.has_token());
    }

    #[test]
    fn test_wildcard_host_rewritten() {
        let config = McpConfig::from_env(&vars(&[
            ("MCP_HTTP_HOST", "0.0.0.0"),
            ("MCP_HTTP_PORT", "3100"),
            ("MCP_API_TOKEN", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3100/");
        assert_eq!(config.token, "secret");
    }

    #[test]
    fn test_explicit_host_kept() {
        let config =
            McpConfig::from_env(&vars(&[("MCP_HTTP_HOST", "10.0.0.7")])).unwrap();
        assert_eq!(config.base_url.host_str(), Some("10.0.0.7"));
        assert_eq!(config.base_url.port(), Some(3001));
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = McpConfig::from_env(&vars(&[("MCP_HTTP_PORT", "http")])).unwrap();
        assert_eq!(config.base_url.port(), Some(3001));
    }

    #[test]
    fn test_env_file_path() {
        let path = env_file_path(Path::new("/proj"));
        assert_eq!(path, Path::new("/proj/javascript/mcpServer/.env"));
    }
}
