use serde::Deserialize;

const DEFAULT_UPSTREAM_BASE: &str = "https://play.ht/api/v2";

/// Provider credentials read from the gateway's process environment.
/// Client input is never consulted — secrets stay server-side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Env {
    #[serde(default)]
    pub play_ai_user_id: Option<String>,
    #[serde(default)]
    pub play_ai_secret_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct TtsProxyConfig {
    credentials: Option<Credentials>,
    upstream_base: String,
}

impl TtsProxyConfig {
    pub fn new(env: &Env) -> Self {
        let credentials = match (&env.play_ai_user_id, &env.play_ai_secret_key) {
            (Some(user_id), Some(secret_key))
                if !user_id.is_empty() && !secret_key.is_empty() =>
            {
                Some(Credentials {
                    user_id: user_id.clone(),
                    secret_key: secret_key.clone(),
                })
            }
            _ => None,
        };

        Self {
            credentials,
            upstream_base: DEFAULT_UPSTREAM_BASE.to_string(),
        }
    }

    /// Point the gateway at a different provider base URL. Tests use this
    /// to swap in a local mock upstream.
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_base = url.into();
        self
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn credentials_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn upstream_base(&self) -> &str {
        &self.upstream_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_env_values_count_as_unconfigured() {
        let env = Env {
            play_ai_user_id: Some(String::new()),
            play_ai_secret_key: Some("sk".to_string()),
        };
        assert!(!TtsProxyConfig::new(&env).credentials_configured());
    }

    #[test]
    fn both_values_present_configures_credentials() {
        let env = Env {
            play_ai_user_id: Some("user".to_string()),
            play_ai_secret_key: Some("sk".to_string()),
        };
        let config = TtsProxyConfig::new(&env);
        assert!(config.credentials_configured());
        assert_eq!(config.credentials().unwrap().user_id, "user");
    }
}
