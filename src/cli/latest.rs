use releasekit::core::{ReleaseError, ReleaseResult};
use releasekit::github::format_failure;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> ReleaseResult<()> {
    let config = super::load_config(config_path)?;
    let client = super::release_client(&config)?;

    let latest = client
        .latest_release_version()
        .await
        .map_err(|failure| ReleaseError::Lookup(format_failure(&failure)))?;

    println!("{}", latest);
    Ok(())
}
