use std::env;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    /// Allowed origins; a single `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_any_origin() {
        let config = CorsConfig::from_lookup(|_| None);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_splits_and_trims_origins() {
        let config = CorsConfig::from_lookup(|key| match key {
            "ALLOWED_ORIGINS" => Some("http://localhost:4200, http://localhost:8100,".to_string()),
            _ => None,
        });

        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:4200", "http://localhost:8100"]
        );
        assert!(!config.allows_any_origin());
    }
}
