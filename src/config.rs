use std::env;

use chrono::NaiveDate;
use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_api_per_min: u32,

    /// Holiday override, comma-separated YYYY-MM-DD. The built-in set is
    /// used when unset.
    pub holiday_dates: Option<Vec<NaiveDate>>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            holiday_dates: env::var("HOLIDAY_DATES").ok().map(|raw| parse_holidays(&raw)),
        }
    }
}

fn parse_holidays(raw: &str) -> Vec<NaiveDate> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .unwrap_or_else(|_| panic!("HOLIDAY_DATES entry '{s}' must be YYYY-MM-DD"))
        })
        .collect()
}
