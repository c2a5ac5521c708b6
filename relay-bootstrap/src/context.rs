use anyhow::Result;

use relay_application::AppState;
use relay_infrastructure::AppConfig;

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config.to_runtime_config()),
        }
    }
}
