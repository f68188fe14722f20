use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client configuration loaded from environment variables.
/// Every variable has a default except the optional fallback seed.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub rust_log: String,
    /// Seed for the canned-fallback picker. `None` seeds from entropy.
    pub fallback_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: normalize_base_url(
                &std::env::var("INTERVIEW_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
            fallback_seed: parse_seed(optional_env("INTERVIEW_FALLBACK_SEED").as_deref())?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Blank or unset means no seed; anything else must be a `u64`.
fn parse_seed(raw: Option<&str>) -> Result<Option<u64>> {
    raw.map(|raw| {
        raw.trim()
            .parse::<u64>()
            .with_context(|| format!("INTERVIEW_FALLBACK_SEED must be an unsigned integer, got {raw:?}"))
    })
    .transpose()
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/"),
            "http://localhost:8000"
        );
        assert_eq!(normalize_base_url(" http://api.test// "), "http://api.test");
    }

    #[test]
    fn test_parse_seed_accepts_integer() {
        assert_eq!(parse_seed(Some("42")).unwrap(), Some(42));
        assert_eq!(parse_seed(Some(" 7 ")).unwrap(), Some(7));
        assert_eq!(parse_seed(None).unwrap(), None);
    }

    #[test]
    fn test_parse_seed_rejects_non_numeric() {
        let err = parse_seed(Some("abc")).unwrap_err();
        assert!(err.to_string().contains("INTERVIEW_FALLBACK_SEED"));
        assert!(parse_seed(Some("-1")).is_err());
    }

    #[test]
    fn test_normalize_keeps_clean_url() {
        assert_eq!(normalize_base_url(DEFAULT_API_URL), DEFAULT_API_URL);
    }
}
