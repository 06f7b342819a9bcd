use std::collections::HashMap;
use std::path::PathBuf;

/// Permission a token needs for the marker routes.
pub const MAP_PERMISSION: &str = "map";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub user: String,
    pub permissions: Vec<String>,
}

impl TokenGrant {
    pub fn has(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub assets_dir: PathBuf,
    pub tokens: HashMap<String, TokenGrant>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {:?}: {}", v, e))?,
            Err(_) => 3000,
        };
        let db_path =
            PathBuf::from(std::env::var("DB_PATH").unwrap_or_else(|_| "data/markers.redb".to_string()));
        let assets_dir =
            PathBuf::from(std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()));
        let tokens = parse_tokens(&std::env::var("API_TOKENS").unwrap_or_default())?;
        if tokens.is_empty() {
            tracing::warn!("API_TOKENS is empty; every marker request will be rejected");
        }
        Ok(Config {
            port,
            db_path,
            assets_dir,
            tokens,
        })
    }
}

/// Parse `user:token:perm|perm` entries separated by commas.
pub fn parse_tokens(raw: &str) -> anyhow::Result<HashMap<String, TokenGrant>> {
    let mut tokens = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.splitn(3, ':');
        let (Some(user), Some(token)) = (parts.next(), parts.next()) else {
            anyhow::bail!("malformed API_TOKENS entry {:?}", entry);
        };
        if user.is_empty() || token.is_empty() {
            anyhow::bail!("malformed API_TOKENS entry {:?}", entry);
        }
        let permissions = parts
            .next()
            .unwrap_or_default()
            .split('|')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        tokens.insert(
            token.to_string(),
            TokenGrant {
                user: user.to_string(),
                permissions,
            },
        );
    }
    Ok(tokens)
}
