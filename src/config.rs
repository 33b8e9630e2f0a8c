// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

/// Duration (minutes) given to a test created without one.
pub const DEFAULT_TEST_DURATION_MINUTES: u32 = 60;

/// Marks awarded per correct answer when a test does not say otherwise.
pub const DEFAULT_MARKS_PER_QUESTION: f64 = 4.0;

/// Marks deducted per wrong answer when a test does not say otherwise.
pub const DEFAULT_NEGATIVE_MARKS: f64 = 0.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Lifetime of issued access tokens, in seconds.
    pub jwt_expiration: u64,
    /// Nominal delay applied to every mock API call.
    pub simulated_latency_ms: u64,
    /// Lets unknown emails sign in by creating an account on the fly.
    pub allow_passwordless_sign_in: bool,
    pub seed_fixtures: bool,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            rust_log,
            bind_addr,
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", 3600),
            simulated_latency_ms: parse_or("SIMULATED_LATENCY_MS", 300),
            allow_passwordless_sign_in: parse_or("ALLOW_PASSWORDLESS_SIGN_IN", true),
            seed_fixtures: parse_or("SEED_FIXTURES", true),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Reads `key` from the environment, falling back to `default` when it is
/// unset or does not parse.
fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using {:?}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}
