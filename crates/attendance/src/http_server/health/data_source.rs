use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::upstream::ScriptEndpoint;
use crate::ServiceState;

#[async_trait]
pub trait DataSource {
    /// Perform various checks on the system to ensure its healthy and ready to accept requests.
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("one or more dependent services aren't available")]
    DependencyFailure,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    #[cfg(test)]
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Ready once the Apps Script endpoint is configured. The deployment itself
/// is not probed.
struct ScriptSource {
    endpoint: ScriptEndpoint,
}

#[async_trait]
impl DataSource for ScriptSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        if self.endpoint.is_configured() {
            Ok(())
        } else {
            Err(DataSourceError::DependencyFailure)
        }
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for StateDataSource {
    type Rejection = ();

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        Ok(StateDataSource(Arc::new(ScriptSource {
            endpoint: state.script().endpoint().clone(),
        })))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Clone)]
    pub(crate) enum MockReadiness {
        DependencyFailure,
        Ready,
    }

    #[async_trait]
    impl DataSource for MockReadiness {
        async fn is_ready(&self) -> Result<(), DataSourceError> {
            use MockReadiness::*;

            match self {
                DependencyFailure => Err(DataSourceError::DependencyFailure),
                Ready => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_script_source_requires_endpoint() {
        let unset = ScriptSource {
            endpoint: ScriptEndpoint::from_setting(None),
        };
        assert!(matches!(
            unset.is_ready().await,
            Err(DataSourceError::DependencyFailure)
        ));

        let set = ScriptSource {
            endpoint: ScriptEndpoint::from_setting(Some("https://script.google.com/macros/s/x/exec")),
        };
        assert!(set.is_ready().await.is_ok());
    }
}
