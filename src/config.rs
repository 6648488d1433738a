use anyhow::{Context, Result};

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SEARCH_API_URL: &str = "https://api.tavily.com/search";

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_api_url: String,
    pub spotify_access_token: String,
    pub openai_api_url: String,
    pub openai_api_key: String,
    pub search_api_url: String,
    pub search_api_key: Option<String>,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|key| std::env::var(key).ok())
}

impl Config {
    /// Build the configuration from any key lookup, treating blank values as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            get(key).with_context(|| format!("Missing required environment variable {key}"))
        };

        Ok(Config {
            spotify_api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            spotify_access_token: required("SPOTIFY_ACCESS_TOKEN")?,
            openai_api_url: get("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            openai_api_key: required("OPENAI_API_KEY")?,
            search_api_url: get("SEARCH_API_URL")
                .unwrap_or_else(|| DEFAULT_SEARCH_API_URL.to_string()),
            search_api_key: get("SEARCH_API_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_for_optional_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("SPOTIFY_ACCESS_TOKEN", "token"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        assert_eq!(config.spotify_api_url, DEFAULT_SPOTIFY_API_URL);
        assert_eq!(config.openai_api_url, DEFAULT_OPENAI_API_URL);
        assert!(config.search_api_key.is_none());
    }

    #[test]
    fn test_missing_required_value_fails() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        assert!(err.to_string().contains("SPOTIFY_ACCESS_TOKEN"));
    }

    #[test]
    fn test_blank_search_key_is_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("SPOTIFY_ACCESS_TOKEN", "token"),
            ("OPENAI_API_KEY", "sk-test"),
            ("SEARCH_API_KEY", "  "),
        ]))
        .unwrap();

        assert!(config.search_api_key.is_none());
    }
}
