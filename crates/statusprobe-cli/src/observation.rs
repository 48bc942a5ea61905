use std::{collections::BTreeMap, time::Instant};

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::CheckError,
    summary::CheckResult,
};

const BODY_PREVIEW_CHARS: usize = 200;

/// What came back for one request: status, headers (lower-case names) and raw body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Observation {
    async fn read(method: &reqwest::Method, response: Response) -> Result<Self, reqwest::Error> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            match headers.get_mut(name.as_str()) {
                Some(existing) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                None => {
                    headers.insert(name.as_str().to_string(), value);
                }
            }
        }
        let body = response.text().await?;
        Ok(Observation {
            method: method.to_string(),
            url,
            status,
            headers,
            body,
        })
    }

    pub fn expect_status(&self, expected: StatusCode) -> Result<(), CheckError> {
        if self.status == expected.as_u16() {
            Ok(())
        } else {
            Err(CheckError::UnexpectedStatus {
                expected: expected.as_u16(),
                actual: self.status,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CheckError> {
        serde_json::from_str(&self.body).map_err(CheckError::from)
    }

    pub fn header(&self, name: &str) -> Result<&str, CheckError> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .ok_or_else(|| CheckError::MissingHeader(name.to_string()))
    }

    pub fn body_preview(&self) -> String {
        let mut preview: String = self.body.chars().take(BODY_PREVIEW_CHARS).collect();
        if self.body.chars().count() > BODY_PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

/// Tracks the exchanges of one check, so the result can report what was last seen.
pub(crate) struct Recorder {
    started: Instant,
    last: Option<Observation>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder {
            started: Instant::now(),
            last: None,
        }
    }

    pub async fn exchange(&mut self, request: RequestBuilder) -> Result<&Observation, CheckError> {
        let (client, request) = request.build_split();
        let request = request?;
        let method = request.method().clone();
        debug!(%method, url = %request.url(), "Sending request");

        let response = client.execute(request).await?;
        let observation = Observation::read(&method, response).await?;
        debug!(
            %method,
            url = %observation.url,
            status = observation.status,
            "Received response"
        );
        Ok(&*self.last.insert(observation))
    }

    pub fn conclude<T>(
        self,
        name: &'static str,
        outcome: Result<T, CheckError>,
    ) -> (CheckResult, Option<T>) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        match outcome {
            Ok(value) => (CheckResult::pass(name, self.last, elapsed_ms), Some(value)),
            Err(e) => (CheckResult::fail(name, self.last, &e, elapsed_ms), None),
        }
    }
}
