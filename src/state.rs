use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::domain::live::GameRelay;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// 게임별 실시간 중계 허브 (프로세스 단위 공유)
    pub relay: Arc<GameRelay>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let relay = Arc::new(GameRelay::new(config.live_channel_capacity));
        Self { db, config, relay }
    }
}
