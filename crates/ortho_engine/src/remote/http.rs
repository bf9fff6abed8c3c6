//! HTTP client for the case data service

use crate::assets::ToothMeshSet;
use crate::remote::protocol::{
    StageTransformRequest, StageTransforms, TeethMeshRequest, ToothId,
};
use crate::remote::{CaseDataSource, FetchError};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct CaseFilePathResponse {
    file_path: String,
}

/// JSON-over-HTTP client for the case data service
pub struct HttpCaseSource {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpCaseSource {
    /// Create a client with the default request timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: impl serde::Serialize,
    ) -> Result<T, FetchError> {
        let response = self
            .agent
            .post(&self.url(path))
            .send_json(body)
            .map_err(map_request_error)?;
        response
            .into_json()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self
            .agent
            .get(&self.url(path))
            .call()
            .map_err(map_request_error)?;
        response
            .into_json()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Health check against the service's `ping` endpoint
    pub fn ping(&self) -> Result<(), FetchError> {
        self.agent
            .get(&self.url("ping"))
            .call()
            .map_err(map_request_error)?;
        Ok(())
    }

    /// Path of the case file the service currently has open
    pub fn case_file_path(&self) -> Result<String, FetchError> {
        let response: CaseFilePathResponse = self.get_json("get_ortho_case_file_path")?;
        Ok(response.file_path)
    }
}

impl CaseDataSource for HttpCaseSource {
    fn fetch_stage_transforms(&self, stage: u32) -> Result<StageTransforms, FetchError> {
        log::debug!("fetching transforms for stage {stage}");
        self.post_json(
            "get_stage_relative_transform",
            StageTransformRequest { stage },
        )
    }

    fn fetch_tooth_meshes(
        &self,
        tooth_ids: &[ToothId],
    ) -> Result<HashMap<ToothId, ToothMeshSet>, FetchError> {
        log::debug!("fetching meshes for {} teeth", tooth_ids.len());
        self.post_json(
            "get_teeth_meshes",
            TeethMeshRequest {
                tooth_ids: tooth_ids.to_vec(),
            },
        )
    }
}

fn map_request_error(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::Status(status, _) => FetchError::Status { status },
        ureq::Error::Transport(transport) => FetchError::Transport(transport.to_string()),
    }
}
