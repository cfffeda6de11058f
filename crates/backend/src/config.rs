use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

/// Where the host listens and which directories it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Built frontend bundle (`index.html` plus `assets/`).
    pub dist_dir: PathBuf,
    /// Long-lived static files served under `/static`.
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            dist_dir: PathBuf::from("dist"),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `DIST_DIR` and `ASSETS_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, default = DEFAULT_PORT, "invalid PORT, using default");
                DEFAULT_PORT
            }),
            None => defaults.port,
        };
        ServerConfig {
            port,
            dist_dir: lookup("DIST_DIR").map(PathBuf::from).unwrap_or(defaults.dist_dir),
            assets_dir: lookup("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn index_path(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.index_path(), PathBuf::from("dist/index.html"));
    }

    #[test]
    fn test_overrides_from_env() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DIST_DIR", "/srv/fra"),
            ("ASSETS_DIR", "/srv/static"),
        ]));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.index_path(), PathBuf::from("/srv/fra/index.html"));
        assert_eq!(cfg.assets_dir, PathBuf::from("/srv/static"));
    }

    #[test]
    fn test_bad_port_falls_back() {
        let cfg = ServerConfig::from_lookup(lookup(&[("PORT", "http")]));
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
