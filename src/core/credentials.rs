use crate::error::{AgentError, Result};

/// Environment variable the API key is read from
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Caller-supplied authentication material for the model provider.
///
/// Never printed: `Debug` masks the key.
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Read the key from `GROQ_API_KEY`; absent is not an error until first use
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(AgentError::MissingCredentials(format!(
                "an API key is required; set {} or pass --api-key",
                API_KEY_ENV
            ))),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = self.api_key.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("api_key", &masked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_missing() {
        let credentials = Credentials::new("   ");
        assert!(!credentials.is_present());
        assert!(matches!(
            credentials.api_key(),
            Err(AgentError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_key_is_trimmed() {
        let credentials = Credentials::new(" gsk_test \n");
        assert_eq!(credentials.api_key().unwrap(), "gsk_test");
    }

    #[test]
    fn test_debug_masks_key() {
        let rendered = format!("{:?}", Credentials::new("gsk_secret"));
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("***"));
    }
}
