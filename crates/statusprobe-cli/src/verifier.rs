use reqwest::{
    Method, StatusCode,
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    },
};
use statusprobe_types::{
    config::VerifierConfig,
    general::ClientName,
    status::{CreateStatusCheck, Greeting, StatusCheck},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{CheckError, Result, expect_eq, expect_non_empty},
    observation::Recorder,
    summary::{CheckResult, RunSummary},
};

pub const ROOT_CHECK: &str = "Root Endpoint";
pub const CREATE_CHECK: &str = "Create Status Check";
pub const LIST_CHECK: &str = "Get Status Checks";
pub const CORS_CHECK: &str = "CORS Configuration";
pub const PERSISTENCE_CHECK: &str = "Persistence Round-trip";

/// Runs black-box checks of the status check API.
///
/// Every `verify_*` method is single-shot and infallible: transport errors and
/// contract mismatches end up in the returned [`CheckResult`].
pub struct Verifier {
    client: reqwest::Client,
    api_url: Url,
    status_url: Url,
    client_name: ClientName,
    greeting: String,
    origin: String,
    expected_allow_origin: Option<String>,
}

impl Verifier {
    pub fn new(config: &VerifierConfig) -> Result<Self> {
        let api_url = config.api_url()?;
        let status_url = api_url
            .join("status")
            .map_err(statusprobe_types::ConfigError::from)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Verifier {
            client,
            api_url,
            status_url,
            client_name: config.client_name.clone(),
            greeting: config.greeting.clone(),
            origin: config.origin.clone(),
            expected_allow_origin: config.expected_allow_origin.clone(),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn client_name(&self) -> &ClientName {
        &self.client_name
    }

    /// Runs root, create, list, CORS and persistence checks in this order.
    ///
    /// The id created by the create check is looked up by the list check.
    pub async fn run_all(&self) -> RunSummary {
        let mut checks = Vec::with_capacity(5);
        checks.push(self.verify_root().await);

        let (created, id) = self.verify_create_resource(&self.client_name).await;
        checks.push(created);
        checks.push(self.verify_list_resources(id.as_deref()).await);

        checks.push(self.verify_cors().await);
        checks.push(self.verify_persistence_roundtrip().await);

        let summary = RunSummary::new(checks);
        info!(passed = summary.passed, "Run finished");
        summary
    }

    pub async fn verify_root(&self) -> CheckResult {
        let mut recorder = Recorder::new();
        let outcome = self.check_root(&mut recorder).await;
        log_outcome(recorder.conclude(ROOT_CHECK, outcome)).0
    }

    /// Returns the id of the new status check when creation passed.
    pub async fn verify_create_resource(&self, name: &ClientName) -> (CheckResult, Option<String>) {
        let mut recorder = Recorder::new();
        let outcome = self.check_create(&mut recorder, name).await;
        log_outcome(recorder.conclude(CREATE_CHECK, outcome))
    }

    pub async fn verify_list_resources(&self, expected_id: Option<&str>) -> CheckResult {
        let mut recorder = Recorder::new();
        let outcome = self.check_list(&mut recorder, expected_id).await;
        log_outcome(recorder.conclude(LIST_CHECK, outcome)).0
    }

    pub async fn verify_cors(&self) -> CheckResult {
        let mut recorder = Recorder::new();
        let outcome = self.check_cors(&mut recorder).await;
        log_outcome(recorder.conclude(CORS_CHECK, outcome)).0
    }

    pub async fn verify_persistence_roundtrip(&self) -> CheckResult {
        let mut recorder = Recorder::new();
        let outcome = self.check_persistence(&mut recorder).await;
        log_outcome(recorder.conclude(PERSISTENCE_CHECK, outcome)).0
    }

    async fn check_root(&self, recorder: &mut Recorder) -> Result<(), CheckError> {
        let observed = recorder
            .exchange(self.client.get(self.api_url.clone()))
            .await?;
        observed.expect_status(StatusCode::OK)?;
        let greeting: Greeting = observed.json()?;
        expect_eq("message", &self.greeting, &greeting.message)
    }

    async fn create(
        &self,
        recorder: &mut Recorder,
        name: &str,
    ) -> Result<StatusCheck, CheckError> {
        let payload = CreateStatusCheck {
            client_name: name.to_string(),
        };
        let observed = recorder
            .exchange(self.client.post(self.status_url.clone()).json(&payload))
            .await?;
        observed.expect_status(StatusCode::OK)?;
        let created: StatusCheck = observed.json()?;
        expect_non_empty("id", &created.id)?;
        expect_eq("client_name", name, &created.client_name)?;
        expect_non_empty("timestamp", &created.timestamp)?;
        debug!(id = %created.id, client_name = %created.client_name, "Created status check");
        Ok(created)
    }

    async fn list(&self, recorder: &mut Recorder) -> Result<Vec<StatusCheck>, CheckError> {
        let observed = recorder
            .exchange(self.client.get(self.status_url.clone()))
            .await?;
        observed.expect_status(StatusCode::OK)?;
        let listed: Vec<StatusCheck> = observed.json()?;
        debug!(count = listed.len(), "Listed status checks");
        Ok(listed)
    }

    async fn check_create(
        &self,
        recorder: &mut Recorder,
        name: &ClientName,
    ) -> Result<String, CheckError> {
        let created = self.create(recorder, name.as_ref()).await?;
        Ok(created.id)
    }

    async fn check_list(
        &self,
        recorder: &mut Recorder,
        expected_id: Option<&str>,
    ) -> Result<(), CheckError> {
        let listed = self.list(recorder).await?;
        match expected_id {
            Some(id) if !listed.iter().any(|c| c.id == id) => Err(CheckError::NotListed {
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    async fn check_cors(&self, recorder: &mut Recorder) -> Result<(), CheckError> {
        for url in [&self.api_url, &self.status_url] {
            let request = self
                .client
                .request(Method::OPTIONS, url.clone())
                .header(ORIGIN, self.origin.as_str())
                .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(ACCESS_CONTROL_REQUEST_HEADERS, "Content-Type");
            let observed = recorder.exchange(request).await?;
            observed.expect_status(StatusCode::OK)?;
            let allow_origin = observed.header(ACCESS_CONTROL_ALLOW_ORIGIN.as_str())?;
            observed.header(ACCESS_CONTROL_ALLOW_METHODS.as_str())?;
            observed.header(ACCESS_CONTROL_ALLOW_HEADERS.as_str())?;
            if let Some(expected) = &self.expected_allow_origin {
                expect_eq(ACCESS_CONTROL_ALLOW_ORIGIN.as_str(), expected, allow_origin)?;
            }
        }
        Ok(())
    }

    /// Creates a uniquely named record and requires the listing to return it,
    /// which a backend that only echoes the request cannot satisfy.
    async fn check_persistence(&self, recorder: &mut Recorder) -> Result<(), CheckError> {
        let name = probe_client_name();
        let created = self.create(recorder, &name).await?;
        let listed = self.list(recorder).await?;
        if listed
            .iter()
            .any(|c| c.id == created.id && c.client_name == name)
        {
            Ok(())
        } else {
            Err(CheckError::NotListed { id: created.id })
        }
    }
}

fn probe_client_name() -> String {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("persistence_probe_{}_{}", now, &suffix[..8])
}

fn log_outcome<T>(outcome: (CheckResult, Option<T>)) -> (CheckResult, Option<T>) {
    let result = &outcome.0;
    match &result.error {
        None => info!(check = result.name, elapsed_ms = result.elapsed_ms, "Check passed"),
        Some(error) => warn!(check = result.name, %error, "Check failed"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use statusprobe_types::config::Parser as _;

    use super::*;

    #[test]
    fn test_probe_client_name_unique() {
        let a = probe_client_name();
        let b = probe_client_name();
        assert!(a.starts_with("persistence_probe_"));
        assert_ne!(a, b);
        assert!(ClientName::from_str(&a).is_ok());
    }

    #[test]
    fn test_new_resolves_urls() {
        let config = VerifierConfig::try_parse_from([
            "statusprobe",
            "--base-url",
            "http://localhost:8000",
            "--secret",
            "x",
        ])
        .unwrap();
        let verifier = Verifier::new(&config).unwrap();
        assert_eq!(verifier.api_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            verifier.status_url.as_str(),
            "http://localhost:8000/api/status"
        );
        assert_eq!(verifier.client_name().as_ref(), "test_client");
    }

    #[test]
    fn test_new_rejects_bad_scheme() {
        let config = VerifierConfig::try_parse_from([
            "statusprobe",
            "--base-url",
            "file:///tmp/backend",
            "--secret",
            "x",
        ])
        .unwrap();
        assert!(matches!(
            Verifier::new(&config),
            Err(crate::Error::Config(_))
        ));
    }
}
