use releasekit::core::{ReleaseError, ReleaseResult};
use releasekit::release::{determine_version, publish};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, artifact_path: &Path) -> ReleaseResult<()> {
    let config = super::load_config(config_path)?;
    let token = config.token()?;

    if !artifact_path.is_file() {
        return Err(ReleaseError::Path(format!(
            "Artifact not found: {}",
            artifact_path.display()
        )));
    }

    let client = super::release_client(&config)?.privileged(config.upload_authority()?, token);

    let version = determine_version(config.version_override().as_deref(), &client).await?;
    let artifact = config.artifact(artifact_path, &version);

    println!("Publishing {} as {}...", artifact.name, version);
    let release_id = publish(&version, &artifact, &client).await?;

    println!("✓ Released {} (release id {})", version, release_id);
    Ok(())
}
