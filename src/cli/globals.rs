use crate::auth::AuthConfig;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AuthConfig,
    pub log_json: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            log_json: false,
        }
    }

    pub fn set_log_json(&mut self, enabled: bool) {
        self.log_json = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let mut args = GlobalArgs::new(AuthConfig::new().with_min_password_length(8));
        assert_eq!(args.config.min_password_length(), 8);
        assert!(!args.log_json);

        args.set_log_json(true);
        assert!(args.log_json);
    }
}
