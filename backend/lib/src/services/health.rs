use std::sync::Arc;

use serde::Serialize;

use crate::{constants::service::SERVICE_NAME, data::market_db::client::DBClient};

#[derive(Debug, Serialize)]
pub struct DetailedHealthStatus {
    pub status: String,
    pub version: String,
    pub service: String,
    pub components: HealthComponents,
}

#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct HealthService {
    db: Arc<DBClient>,
}

impl HealthService {
    pub fn new(db: Arc<DBClient>) -> Self {
        Self { db }
    }

    pub async fn check_health(&self) -> DetailedHealthStatus {
        let database_health = self.check_database().await;

        let overall_status = if database_health.status == "healthy" {
            "healthy"
        } else {
            "unhealthy"
        };

        DetailedHealthStatus {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: SERVICE_NAME.to_string(),
            components: HealthComponents {
                database: database_health,
            },
        }
    }

    async fn check_database(&self) -> ComponentHealth {
        match self.db.test_connection().await {
            Ok(_) => ComponentHealth {
                status: "healthy".to_string(),
                message: None,
            },
            Err(e) => ComponentHealth {
                status: "unhealthy".to_string(),
                message: Some(format!("Database error: {}", e)),
            },
        }
    }
}
