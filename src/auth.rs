use std::fmt;

use crate::error::{BotError, Result};

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Secrets required to poll the review API and post to Telegram.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish_non_exhaustive()
    }
}

/// True iff every secret is present and non-empty.
pub fn check_tokens(values: &[Option<&str>]) -> bool {
    values.iter().all(|v| v.is_some_and(|s| !s.is_empty()))
}

impl Credentials {
    /// Read the secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_values(
            var(PRACTICUM_TOKEN_VAR),
            var(TELEGRAM_TOKEN_VAR),
            var(TELEGRAM_CHAT_ID_VAR),
        )
    }

    /// Build credentials, reporting every absent or empty secret by name.
    pub fn from_values(
        practicum_token: Option<String>,
        telegram_token: Option<String>,
        telegram_chat_id: Option<String>,
    ) -> Result<Self> {
        let present = [
            practicum_token.as_deref(),
            telegram_token.as_deref(),
            telegram_chat_id.as_deref(),
        ];
        if !check_tokens(&present) {
            let missing = [PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR]
                .into_iter()
                .zip(present)
                .filter(|(_, v)| !check_tokens(&[*v]))
                .map(|(name, _)| name)
                .collect();
            return Err(BotError::MissingTokens(missing));
        }

        Ok(Self {
            practicum_token: practicum_token.unwrap_or_default(),
            telegram_token: telegram_token.unwrap_or_default(),
            telegram_chat_id: telegram_chat_id.unwrap_or_default(),
        })
    }
}
