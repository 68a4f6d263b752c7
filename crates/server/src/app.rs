//! Wiring of gateways, services and background tasks from configuration.

use shared_types::AppError;
use std::sync::Arc;

use crate::auth::{
    HttpIdamService, S2sTokenGenerator, S2sTokenValidator, ServiceAuthorisation, SystemAuth,
};
use crate::bulk::BulkActionServices;
use crate::ccd::{CcdClient, RetryPolicy};
use crate::config::GatewayConfig;
use crate::state::AppState;
use crate::tasks::TaskDeps;

/// Everything the binary needs to serve and to run scheduled tasks.
pub struct Application {
    pub state: AppState,
    pub task_deps: TaskDeps,
}

impl Application {
    /// Build HTTP-backed gateways from `config` and wire every service on top.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = config.http_client()?;
        let ccd = Arc::new(CcdClient::from_config(client.clone(), config));
        let auth = SystemAuth::new(
            Arc::new(HttpIdamService::new(client.clone(), config)),
            Arc::new(S2sTokenGenerator::new(client.clone(), config)),
        );
        let service_authorisation = ServiceAuthorisation::new(
            Arc::new(S2sTokenValidator::new(client, config)),
            &crate::config::auth_settings().authorised_services,
        );
        let retry = RetryPolicy::from_settings();

        let services = BulkActionServices::new(ccd.clone(), ccd.clone(), auth.clone(), retry);
        let task_deps = TaskDeps {
            search: ccd.clone(),
            submission: ccd,
            task_util: services.task_util.clone(),
            auth: auth.clone(),
            retry,
        };

        Ok(Self {
            state: AppState {
                services,
                auth,
                service_authorisation,
            },
            task_deps,
        })
    }
}
