//! Remote case data source boundary
//!
//! The mesh and transform data live behind an HTTP-like request/response
//! service. Everything above this module talks to the [`CaseDataSource`]
//! trait; the concrete [`http::HttpCaseSource`] client lives behind it,
//! as do the scripted sources the tests use.

pub mod http;
pub mod protocol;

pub use http::HttpCaseSource;
pub use protocol::{QuaternionRecord, StageTransforms, ToothId, TransformRecord, VectorRecord};

use crate::assets::ToothMeshSet;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from the case data service boundary
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (connection, DNS, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status
    #[error("case service returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Request/response boundary to the case data service
///
/// Both calls are blocking from the caller's point of view; overlapping
/// stage loads are sequenced by the scene synchronizer's generation
/// tokens, not by this trait.
pub trait CaseDataSource {
    /// Fetch the full per-tooth transform set for one treatment stage
    ///
    /// One request covers the whole stage to amortize round trips. A
    /// tooth mapped to `None` has no usable transform for this stage and
    /// renders at identity.
    fn fetch_stage_transforms(&self, stage: u32) -> Result<StageTransforms, FetchError>;

    /// Fetch mesh variants for the given teeth in one batch
    fn fetch_tooth_meshes(
        &self,
        tooth_ids: &[ToothId],
    ) -> Result<HashMap<ToothId, ToothMeshSet>, FetchError>;
}
