use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub app_name: String,
    pub addr: SocketAddr,
    pub seed_demo_data: bool,
    pub auth: AuthConfig,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub key: String,
    pub token_ttl: time::Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::temp_dir().join("p4p-default"),
            app_name: "Pound for Pound".to_string(),
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            seed_demo_data: false,
            auth: AuthConfig {
                key: "cG91bmQtZm9yLXBvdW5kLXRlc3Qta2V5".to_string(),
                token_ttl: time::Duration::days(1),
                cookie_name: "p4p_session".to_string(),
                cookie_secure: false,
            },
        }
    }
}
