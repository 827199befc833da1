use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_PORTAL_BASE_URL: &str = "https://examweb.ggsipu.ac.in/web/";
pub const DEFAULT_CREDITS_CSV: &str = "ipu_all_subjects_all_years_all_branches.csv";

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    // Parsed only when the portal is actually contacted.
    pub portal_base_url: String,
    pub credits_csv: String,
    pub enrollment_no: Option<String>,
    pub password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            portal_base_url: std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| DEFAULT_PORTAL_BASE_URL.to_string()),
            credits_csv: std::env::var("CREDITS_CSV").unwrap_or_else(|_| DEFAULT_CREDITS_CSV.to_string()),
            enrollment_no: optional_env("PORTAL_ENROLLMENT_NO"),
            password: optional_env("PORTAL_PASSWORD"),
        }
    }

    pub fn portal_url(&self) -> Result<Url> {
        parse_base_url(&self.portal_base_url)
    }
}

// Endpoints are joined onto the base, so it needs a trailing slash.
pub fn parse_base_url(base: &str) -> Result<Url> {
    let base = if base.ends_with('/') { base.to_string() } else { format!("{}/", base) };
    Url::parse(&base).with_context(|| format!("PORTAL_BASE_URL '{}' is not a valid URL", base))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
