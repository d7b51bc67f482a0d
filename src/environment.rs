use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the backends the dashboard can be pointed at.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Backend running on the same machine (`start_webapp` default port).
    #[default]
    Local,
    /// Public election results deployment.
    Production,
    /// Any other backend, given by its base URL.
    Custom { base_url: String },
}

impl Environment {
    /// Returns the base URL that REST endpoints (`/api/...`) hang off.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8080".to_string(),
            Environment::Production => "https://volby.live".to_string(),
            Environment::Custom { base_url } => base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the websocket URL of the push channel for this backend.
    pub fn push_url(&self) -> String {
        let base = self.api_url();
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base
        };
        format!("{}/ws", ws_base)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Err(()),
            "local" => Ok(Environment::Local),
            "production" | "prod" => Ok(Environment::Production),
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                Ok(Environment::Custom {
                    base_url: trimmed.to_string(),
                })
            }
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Production => write!(f, "Production"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}
