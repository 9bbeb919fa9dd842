// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Number of questions requested from the extraction model per material.
pub const QUESTIONS_PER_MATERIAL: usize = 20;

/// Maximum number of questions served in one student review session.
pub const REVIEW_FEED_SIZE: i64 = 15;

/// Upper bound on downloaded material size (10 MB, matching the upload cap).
pub const MAX_MATERIAL_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,

    /// Base URL of the blob store holding uploaded course materials.
    pub storage_base_url: String,

    /// Generative AI completion API settings.
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let storage_base_url = env::var("STORAGE_BASE_URL").expect("STORAGE_BASE_URL must be set");

        let gemini_api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            storage_base_url,
            gemini_api_key,
            gemini_base_url,
            gemini_model,
        }
    }
}
