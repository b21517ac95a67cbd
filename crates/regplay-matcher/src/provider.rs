use async_trait::async_trait;

use crate::{MatchError, MatchRequest, MatchResponse};

#[async_trait]
pub trait Matcher: Send + Sync {
    /// Short name for status display and logs.
    fn name(&self) -> &str;

    /// Evaluate `req` and return every match, in text order.
    ///
    /// Implementations report every failure (transport, rejection, bad
    /// payload) through [`MatchError`]; they never panic.
    async fn run(&self, req: MatchRequest) -> Result<MatchResponse, MatchError>;

    /// Liveness check.  The default reports healthy.
    async fn ping(&self) -> Result<(), MatchError> {
        Ok(())
    }
}
