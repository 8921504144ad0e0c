use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which task store the page controller talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Everything lives in the local persistence handle.
    Local,
    /// Tasks go through the HTTP task service at `api_url`.
    Remote,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "remote" => Ok(Backend::Remote),
            other => Err(AppError::BadRequest(format!(
                "TASK_BACKEND must be 'local' or 'remote', got '{}'",
                other
            ))),
        }
    }
}

pub struct Config {
    pub data_file: PathBuf,
    pub server_port: u16,
    pub server_host: String,
    pub api_url: String,
    pub backend: Backend,
    pub bcrypt_cost: u32,
    pub seed_demo_users: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            data_file: env::var("TASKBOARD_DATA_FILE")
                .unwrap_or_else(|_| "taskboard.json".to_string())
                .into(),
            server_port: parse_var("SERVER_PORT", 5000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            api_url: env::var("TASK_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            backend: parse_var("TASK_BACKEND", Backend::Local)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            seed_demo_users: parse_var("SEED_DEMO_USERS", true)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("{} has an invalid value: '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}
