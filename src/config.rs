use std::env;

/// Authoring-policy defaults, applied when a draft request leaves the
/// corresponding field unset.
#[derive(Clone, Debug)]
pub struct Config {
    pub default_passing_score: f64,
    pub default_max_attempts: u32,
    pub default_time_limit_minutes: Option<u32>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            default_passing_score: env::var("QUIZ_DEFAULT_PASSING_SCORE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(70.0),
            default_max_attempts: env::var("QUIZ_DEFAULT_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            default_time_limit_minutes: env::var("QUIZ_DEFAULT_TIME_LIMIT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            default_passing_score: 70.0,
            default_max_attempts: 3,
            default_time_limit_minutes: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_passing_score: 70.0,
            default_max_attempts: 3,
            default_time_limit_minutes: None,
        }
    }
}
