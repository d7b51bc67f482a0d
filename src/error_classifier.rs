use crate::api::error::ApiError;
use crate::logging::LogLevel;
use crate::push::PushError;

#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_fetch_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Rate limited; the next tick retries anyway
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Unknown region, or a backend that refuses us
            ApiError::Http {
                status: 401 | 403 | 404,
                ..
            } => LogLevel::Error,

            // Backend changed shape under us
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }

    pub fn classify_push_error(&self, error: &PushError) -> LogLevel {
        match error {
            // Server down or unreachable; REST polling covers it
            PushError::Connect(_) => LogLevel::Debug,
            PushError::Protocol(_) => LogLevel::Warn,
            PushError::Encode(_) | PushError::ChannelClosed => LogLevel::Error,
        }
    }
}
