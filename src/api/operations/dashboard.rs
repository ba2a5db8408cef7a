use serde_json::Value;

use super::empty;
use crate::api::endpoints;
use crate::api::result::ApiResult;
use crate::api::transport::RequestOptions;
use crate::api::Dispatcher;

impl Dispatcher {
    pub async fn dashboard_stats(&self) -> ApiResult<Value> {
        self.invoke(
            endpoints::DASHBOARD_STATS,
            RequestOptions::post(empty()).authenticated(),
        )
        .await
    }

    pub async fn system_status(&self) -> ApiResult<Value> {
        self.invoke(
            endpoints::DASHBOARD_SYSTEM_STATUS,
            RequestOptions::post(empty()).authenticated(),
        )
        .await
    }

    /// Re-check components and return the fresh status
    pub async fn refresh_system_status(&self) -> ApiResult<Value> {
        self.invoke(
            endpoints::DASHBOARD_REFRESH_STATUS,
            RequestOptions::post(empty()).authenticated(),
        )
        .await
    }
}
