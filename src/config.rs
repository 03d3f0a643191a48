// Configuration: where the backend lives and where the session token is
// kept between runs. The base URL can be baked in at build time and then
// overridden by the environment or the command line.

use std::path::PathBuf;

/// Name of the build-time and runtime variable carrying the API base URL.
pub const API_BASE_URL_VAR: &str = "BOOKSHELF_API_BASE_URL";

/// Used when neither the build nor the environment provide a base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// File name of the persisted bearer token inside the home directory.
pub const TOKEN_FILE_NAME: &str = ".bookshelf_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub token_path: PathBuf,
}

impl Config {
    /// The runtime environment variable wins over the value baked in at
    /// build time.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_BASE_URL_VAR)
            .ok()
            .or_else(|| option_env!("BOOKSHELF_API_BASE_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        Config {
            base_url: normalize_base_url(&base_url),
            token_path: default_token_path(),
        }
    }

    /// Apply command-line overrides on top of [`Config::from_env`].
    pub fn resolve(api_url: Option<String>, token_file: Option<PathBuf>) -> Self {
        let mut config = Self::from_env();
        if let Some(url) = api_url {
            config.base_url = normalize_base_url(&url);
        }
        if let Some(path) = token_file {
            config.token_path = path;
        }
        config
    }
}

/// Token file in the user's home directory, or the working directory when
/// no home can be determined.
pub fn default_token_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(TOKEN_FILE_NAME)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        assert_eq!(normalize_base_url("http://api.test/"), "http://api.test");
        assert_eq!(normalize_base_url(" http://api.test// "), "http://api.test");
        assert_eq!(normalize_base_url("http://api.test"), "http://api.test");
    }

    #[test]
    fn command_line_overrides_win() {
        let config = Config::resolve(
            Some("http://override.test/".into()),
            Some(PathBuf::from("/tmp/token")),
        );
        assert_eq!(config.base_url, "http://override.test");
        assert_eq!(config.token_path, PathBuf::from("/tmp/token"));
    }

    #[test]
    fn token_path_uses_fixed_file_name() {
        assert!(default_token_path().ends_with(TOKEN_FILE_NAME));
    }
}
