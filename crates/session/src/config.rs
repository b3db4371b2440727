use std::time::Duration;

use postpilot_auth::{Locale, RoleTable};

/// Fourteen minutes: stays under the backend's assumed fifteen-minute
/// session token lifetime, so the reactive 401 path is a backstop, not
/// the primary mechanism.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(14 * 60);

/// Configuration for one [`crate::SessionService`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub base_url: String,
    pub locale: Locale,
    pub refresh_interval: Duration,
    pub table: RoleTable,
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            locale: Locale::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            table: RoleTable::standard(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_table(mut self, table: RoleTable) -> Self {
        self.table = table;
        self
    }
}
