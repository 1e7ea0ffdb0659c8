//! Cluster orchestration API client.
//!
//! Talks to the Kubernetes REST surface directly for the two things swappr
//! needs from it: manipulating the hardware-discovery cron job, and locating
//! service pods by label.

use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use swappr_common::discovery::{DiscoverySchedule, ScheduleError};
use swappr_common::error::ApiError;
use swappr_common::orchestration::PodFinder;

/// Namespace holding the cluster management services.
pub const SERVICES_NAMESPACE: &str = "services";
/// Name of the periodic hardware-discovery cron job.
pub const DISCOVERY_CRON_JOB: &str = "hardware-discovery";

pub struct KubeClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct PodList {
    items: Vec<Pod>,
}

#[derive(Deserialize)]
struct Pod {
    metadata: Metadata,
}

#[derive(Deserialize)]
struct Metadata {
    name: String,
}

#[derive(Deserialize)]
struct JobList {
    items: Vec<Job>,
}

#[derive(Deserialize)]
struct Job {
    #[serde(default)]
    status: JobStatus,
}

#[derive(Deserialize, Default)]
struct JobStatus {
    #[serde(rename = "completionTime")]
    completion_time: Option<DateTime<Utc>>,
}

impl KubeClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        KubeClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|err| ApiError::transport(path, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        response
            .json()
            .await
            .map_err(|err| ApiError::response(path, err))
    }
}

#[async_trait]
impl PodFinder for KubeClient {
    async fn pod_names(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ApiError> {
        let pods: PodList = self
            .get_json(&format!(
                "/api/v1/namespaces/{namespace}/pods?labelSelector={label_selector}"
            ))
            .await?;
        Ok(pods.items.into_iter().map(|pod| pod.metadata.name).collect())
    }
}

#[async_trait]
impl DiscoverySchedule for KubeClient {
    async fn set_suspended(&self, suspended: bool) -> Result<(), ScheduleError> {
        let path = format!(
            "/apis/batch/v1/namespaces/{SERVICES_NAMESPACE}/cronjobs/{DISCOVERY_CRON_JOB}"
        );
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .header("Content-Type", "application/merge-patch+json")
            .json(&json!({ "spec": { "suspend": suspended } }))
            .send()
            .await
            .map_err(|err| ScheduleError::Update(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScheduleError::Update(format!("{status}: {body}")));
        }
        Ok(())
    }

    async fn last_cycle_completed(&self) -> Result<Option<SystemTime>, ScheduleError> {
        let jobs: JobList = self
            .get_json(&format!(
                "/apis/batch/v1/namespaces/{SERVICES_NAMESPACE}/jobs\
                 ?labelSelector=app.kubernetes.io/name={DISCOVERY_CRON_JOB}"
            ))
            .await
            .map_err(|err| ScheduleError::Query(err.to_string()))?;

        Ok(jobs
            .items
            .into_iter()
            .filter_map(|job| job.status.completion_time)
            .max()
            .map(SystemTime::from))
    }
}
