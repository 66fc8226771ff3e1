use std::env;

#[derive(Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub sqlite_path: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub activation_secret: String,
    pub token_header: String,
    pub cors_allowlist: Vec<String>,
    pub skills_catalog_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8800);

        let sqlite_path =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "./data/projecthub.sqlite".to_string());
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_default();
        let activation_secret = env::var("JWT_SECRET_ACTIVATE").unwrap_or_default();

        let token_header = env::var("TOKEN_HEADER").unwrap_or_else(|_| "Authorization".to_string());

        let cors_allowlist = parse_allowlist(&env::var("CORS_ALLOWLIST").unwrap_or_default());
        let skills_catalog_path = env::var("SKILLS_CATALOG_PATH").ok().filter(|v| !v.trim().is_empty());

        Self {
            server_port,
            sqlite_path,
            database_url,
            jwt_secret,
            activation_secret,
            token_header,
            cors_allowlist,
            skills_catalog_path,
        }
    }

    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }

        let path = self.sqlite_path.trim();
        if path.starts_with("sqlite:") || path.starts_with("file:") {
            return path.to_string();
        }
        format!("sqlite://{}?mode=rwc", path)
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.cors_allowlist.iter().any(|o| o == origin)
    }
}

fn parse_allowlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        sqlite_path: ":memory:".to_string(),
        database_url: Some("sqlite::memory:".to_string()),
        jwt_secret: "test-auth-secret".to_string(),
        activation_secret: "test-activation-secret".to_string(),
        token_header: "Authorization".to_string(),
        cors_allowlist: vec!["http://localhost:3000".to_string()],
        skills_catalog_path: None,
    }
}
