use crate::error::{BadEnvVarSnafu, ParseIntSnafu, StudentsResult};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::{str::FromStr, sync::Arc};

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    server_config: ServerConfig,
}

impl RuntimeConfiguration {
    pub fn new() -> StudentsResult<Self> {
        Ok(Self {
            db_config: Arc::new(DbConfig::new()?),
            server_config: ServerConfig::new()?,
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub const fn server_config(&self) -> &ServerConfig {
        &self.server_config
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    pub fn new() -> StudentsResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?
                .parse()
                .context(ParseIntSnafu { name: "DB_PORT" })?,
            database: get_env_var("DB_NAME")?,
        })
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}

/// Knobs for the HTTP side, all optional with defaults.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_ip: String,
    pub max_connections: u32,
    pub max_body_bytes: usize,
}

fn optional_number<T: FromStr<Err = std::num::ParseIntError>>(
    name: &'static str,
    default: T,
) -> StudentsResult<T> {
    match var(name) {
        Ok(raw) => raw.trim().parse().context(ParseIntSnafu { name }),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    pub fn new() -> StudentsResult<Self> {
        Ok(Self {
            server_ip: var("STUDENTS_SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string()),
            max_connections: optional_number("STUDENTS_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            max_body_bytes: optional_number("STUDENTS_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_ip: DEFAULT_SERVER_IP.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
