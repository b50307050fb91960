use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

/// Whether a graded Fail can be retaken without an admin score reset.
/// The portal brands disagree on this, so it is a deployment choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetakePolicy {
    Free,
    AdminReset,
}

impl std::str::FromStr for RetakePolicy {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "free" => Ok(RetakePolicy::Free),
            "admin_reset" => Ok(RetakePolicy::AdminReset),
            other => Err(format!("unknown retake policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub mail_gateway_url: String,
    pub mail_gateway_secret: String,
    pub retake_policy: RetakePolicy,
    pub public_rps: u32,
    pub portal_rps: u32,
    pub exports_dir: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            mail_gateway_url: get_env("MAIL_GATEWAY_URL")?,
            mail_gateway_secret: get_env("MAIL_GATEWAY_SECRET")?,
            retake_policy: get_env_parse("RETAKE_POLICY")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            portal_rps: get_env_parse("PORTAL_RPS")?,
            exports_dir: env::var("EXPORTS_DIR").unwrap_or_else(|_| "exports".to_string()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
