/// Configuration management for the API server
///
/// All configuration comes from environment variables, loaded once at startup.
/// A `.env` file is honored in development via dotenvy.
///
/// Required:
/// - `DATABASE_URL`: PostgreSQL connection string
/// - `JWT_SECRET`: signing secret, only when `AUTH_STRATEGY=token`
///
/// Optional:
/// - `API_HOST` (default `0.0.0.0`)
/// - `API_PORT` (default `8080`)
/// - `DATABASE_MAX_CONNECTIONS` (default `10`)
/// - `AUTH_STRATEGY`: `session` or `token` (default `session`)
/// - `SESSION_TTL_HOURS` / `TOKEN_TTL_HOURS` (default `24`)

use std::env;

/// Which authentication strategy the server runs with
///
/// Chosen once at startup; handlers never branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Server-side session state, opaque cookie reference
    Session,

    /// Stateless signed bearer token
    Token,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum pool connections
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Selected strategy
    pub strategy: AuthStrategy,

    /// Token signing secret, present when the strategy is `Token`
    pub jwt_secret: Option<String>,

    /// Credential lifetime in hours
    pub ttl_hours: i64,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidVar { var: String, message: String },
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a numeric variable
    /// fails to parse, `AUTH_STRATEGY` is unrecognized, or the token strategy
    /// is selected with a missing or too-short `JWT_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("API_PORT", 8080)?;

        let url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 10)?;

        let strategy = match env::var("AUTH_STRATEGY").as_deref() {
            Ok("session") | Err(_) => AuthStrategy::Session,
            Ok("token") => AuthStrategy::Token,
            Ok(other) => {
                return Err(ConfigError::InvalidVar {
                    var: "AUTH_STRATEGY".to_string(),
                    message: format!("expected 'session' or 'token', got '{}'", other),
                })
            }
        };

        let jwt_secret = match strategy {
            AuthStrategy::Session => env::var("JWT_SECRET").ok(),
            AuthStrategy::Token => {
                let secret = env::var("JWT_SECRET")
                    .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
                if secret.len() < 32 {
                    return Err(ConfigError::InvalidVar {
                        var: "JWT_SECRET".to_string(),
                        message: "must be at least 32 characters".to_string(),
                    });
                }
                Some(secret)
            }
        };

        let ttl_var = match strategy {
            AuthStrategy::Session => "SESSION_TTL_HOURS",
            AuthStrategy::Token => "TOKEN_TTL_HOURS",
        };
        let ttl_hours: i64 = parse_var(ttl_var, 24)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::InvalidVar {
                var: ttl_var.to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(Self {
            api: ApiConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            auth: AuthConfig {
                strategy,
                jwt_secret,
                ttl_hours,
            },
        })
    }

    /// Socket address string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var: var.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state, so each uses distinct variables or
    // restores what it changes. Serial execution is not assumed.

    #[test]
    fn test_bind_address() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/taskdeck".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                strategy: AuthStrategy::Session,
                jwt_secret: None,
                ttl_hours: 24,
            },
        };
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_var_default() {
        let port: u16 = parse_var("TASKDECK_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_var_invalid() {
        env::set_var("TASKDECK_TEST_BAD_PORT", "not-a-number");
        let result: Result<u16, _> = parse_var("TASKDECK_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        env::remove_var("TASKDECK_TEST_BAD_PORT");
    }
}
