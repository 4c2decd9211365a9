//! Body of `GET /health`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceState,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: ComponentStatus,
}

#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub status: ComponentState,
    pub message: &'static str,
}

impl ComponentStatus {
    /// Result of pinging the entry store.
    pub fn store(reachable: bool) -> Self {
        if reachable {
            Self {
                status: ComponentState::Ok,
                message: "Store reachable",
            }
        } else {
            Self {
                status: ComponentState::Error,
                message: "Store connection failed",
            }
        }
    }
}

impl HealthResponse {
    /// Healthy only when every component check passed.
    pub fn from_checks(checks: HealthChecks) -> Self {
        let status = if checks.store.status == ComponentState::Ok {
            ServiceState::Healthy
        } else {
            ServiceState::Degraded
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceState::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_store_degrades_service() {
        let response = HealthResponse::from_checks(HealthChecks {
            store: ComponentStatus::store(false),
        });
        assert!(!response.is_healthy());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"]["store"]["status"], "error");
        assert_eq!(json["checks"]["store"]["message"], "Store connection failed");
    }

    #[test]
    fn test_reachable_store_is_healthy() {
        let response = HealthResponse::from_checks(HealthChecks {
            store: ComponentStatus::store(true),
        });
        assert!(response.is_healthy());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"]["store"]["status"], "ok");
    }
}
