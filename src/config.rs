use std::env;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SECRET_KEY: &str = "dev-secret-key";
const DEFAULT_DATABASE_PATH: &str = "site.db";
const DEFAULT_FOOTBALL_API_URL: &str = "https://api.football-data.org/v4";
const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub secret_key: String,
    pub football_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub database_path: PathBuf,
    pub football_api_url: String,
    pub news_api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let secret_key = opt_var("SECRET_KEY").unwrap_or_else(|| {
            warn!("SECRET_KEY not set, using the development default");
            DEFAULT_SECRET_KEY.to_string()
        });

        let football_api_key = opt_var("FOOTBALL_DATA_API_KEY");
        if football_api_key.is_none() {
            warn!("FOOTBALL_DATA_API_KEY not set, match and standings pages will be empty");
        }
        let news_api_key = opt_var("NEWS_API_KEY");
        if news_api_key.is_none() {
            warn!("NEWS_API_KEY not set, the news page will be empty");
        }

        let database_path = opt_var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let football_api_url = base_url_var("FOOTBALL_API_URL", DEFAULT_FOOTBALL_API_URL);
        let news_api_url = base_url_var("NEWS_API_URL", DEFAULT_NEWS_API_URL);

        Self {
            port,
            secret_key,
            football_api_key,
            news_api_key,
            database_path,
            football_api_url,
            news_api_url,
        }
    }
}

fn opt_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn base_url_var(key: &str, default: &str) -> String {
    opt_var(key)
        .map(|val| val.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}
