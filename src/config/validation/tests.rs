//! Test suite for configuration validators

#[cfg(test)]
mod tests {
    use crate::config::Validate;
    use crate::config::models::*;

    #[test]
    fn test_default_app_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_rejects_zero_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_rejects_zero_workers() {
        let config = ServerConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_wildcard_with_credentials_rejected() {
        let config = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_rejects_short_secret() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("32 characters"));
    }

    #[test]
    fn test_auth_rejects_weak_secret() {
        let config = AuthConfig {
            jwt_secret: "a".repeat(40),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_rejects_short_expiration() {
        let config = AuthConfig {
            jwt_expiration: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_url_schemes() {
        let mut config = DatabaseConfig::default();
        assert!(config.validate().is_ok());

        config.url = "postgres://localhost/docflow".to_string();
        assert!(config.validate().is_ok());

        config.url = "mysql://localhost/docflow".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_collaboration_rejects_non_positive_ttl() {
        let config = CollaborationConfig {
            invitation_ttl_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_collaboration_rejects_bad_base_url() {
        let config = CollaborationConfig {
            app_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_prefixes_section_name() {
        let mut config = AppConfig::default();
        config.collaboration.outbox_capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("Collaboration config error"));
    }
}
