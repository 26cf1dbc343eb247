//! S3 fingerprint source using opendal.
//!
//! Each watch path `s3://<bucket>/<key>` becomes a metadata-only `stat`
//! (HEAD) request against `<bucket>`; the object's ETag is the fingerprint.

use std::collections::HashMap;

use async_trait::async_trait;
use opendal::{services::S3, ErrorKind, Operator};
use parking_lot::Mutex;

use super::{Fingerprint, FingerprintSource};
use crate::error::{ErrorCode, SourceError};
use crate::watcher::WatchPath;

/// Scheme served by [`S3Source`].
pub const S3_SCHEME: &str = "s3";

/// Connection options for [`S3Source`].
#[derive(Debug, Clone, Default)]
pub struct S3Options {
    /// AWS region. Falls back to the standard AWS environment when unset.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
}

/// Fingerprint source for objects in S3 buckets.
///
/// Operators are built lazily, one per bucket, and reused across polls.
pub struct S3Source {
    options: S3Options,
    operators: Mutex<HashMap<String, Operator>>,
}

impl S3Source {
    /// Create a source with the given connection options.
    #[must_use]
    pub fn new(options: S3Options) -> Self {
        Self {
            options,
            operators: Mutex::new(HashMap::new()),
        }
    }

    /// Get or build the operator for `bucket`.
    fn operator(&self, bucket: &str) -> opendal::Result<Operator> {
        let mut operators = self.operators.lock();
        if let Some(op) = operators.get(bucket) {
            return Ok(op.clone());
        }

        let mut builder = S3::default().bucket(bucket);
        if let Some(region) = &self.options.region {
            builder = builder.region(region);
        }
        if let Some(endpoint) = &self.options.endpoint {
            builder = builder.endpoint(endpoint);
        }

        let op = Operator::new(builder)?.finish();
        operators.insert(bucket.to_string(), op.clone());
        tracing::debug!(bucket, "Built S3 operator");

        Ok(op)
    }
}

impl std::fmt::Debug for S3Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Source")
            .field("options", &self.options)
            .field("buckets", &self.operators.lock().len())
            .finish()
    }
}

#[async_trait]
impl FingerprintSource for S3Source {
    fn scheme(&self) -> &str {
        S3_SCHEME
    }

    async fn fetch(&self, path: &WatchPath) -> Result<Fingerprint, SourceError> {
        let op = self
            .operator(path.container())
            .map_err(|e| classify(path, &e))?;

        let meta = op
            .stat(path.name())
            .await
            .map_err(|e| classify(path, &e))?;

        meta.etag()
            .or_else(|| meta.version())
            .map(Fingerprint::new)
            .ok_or_else(|| SourceError::MissingFingerprint {
                path: path.to_string(),
            })
    }
}

/// Map an opendal error onto the source error taxonomy.
///
/// Kinds the service reported keep their code; anything opendal could not
/// attribute to the service counts as a transport failure.
fn classify(path: &WatchPath, err: &opendal::Error) -> SourceError {
    let code = match err.kind() {
        ErrorKind::NotFound => ErrorCode::NotFound,
        ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
        ErrorKind::RateLimited => ErrorCode::RateLimited,
        ErrorKind::Unexpected | ErrorKind::ConfigInvalid | ErrorKind::Unsupported => {
            return SourceError::transport(path.as_str(), err.to_string());
        }
        other => ErrorCode::Other(other.to_string()),
    };

    SourceError::backend(path.as_str(), code, err.to_string())
}
