use releasekit::core::ReleaseResult;
use releasekit::release::determine_version;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> ReleaseResult<()> {
    let config = super::load_config(config_path)?;
    let client = super::release_client(&config)?;

    let version = determine_version(config.version_override().as_deref(), &client).await?;

    println!("{}", version);
    Ok(())
}
