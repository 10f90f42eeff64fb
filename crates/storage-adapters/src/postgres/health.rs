use async_trait::async_trait;
use domains::ports::HealthCheck;
use domains::DomainResult;

use super::Database;

pub struct DatabaseHealthCheck {
    db: Database,
}

impl DatabaseHealthCheck {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealthCheck {
    async fn check(&self) -> DomainResult<()> {
        self.db.ping().await
    }
}
