pub mod latest;
pub mod next_version;
pub mod publish;

use releasekit::config::Config;
use releasekit::core::ReleaseResult;
use releasekit::github::{GitHubHttp, LoggingAuditor};
use std::path::Path;
use std::sync::Arc;

pub fn load_config(path: Option<&Path>) -> ReleaseResult<Config> {
    Config::load(path)
}

/// Unauthenticated client for the configured repository, audited to the log
pub fn release_client(config: &Config) -> ReleaseResult<GitHubHttp> {
    Ok(GitHubHttp::new(
        config.api_authority()?,
        config.repository()?,
        &config.trust_store()?,
        Arc::new(LoggingAuditor),
        config.timeouts(),
    )?
    .with_user_agent(config.user_agent.as_str()))
}
