//! Ambient AWS environment

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Resolve region and credentials with the standard AWS provider chain:
/// environment variables, shared config and credentials files, profiles,
/// SSO, then container and instance metadata.
///
/// # Arguments
/// * `region` - Overrides the region resolved from the environment
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    let sdk_config = loader.load().await;

    debug!(
        "Resolved AWS region {}",
        sdk_config
            .region()
            .map(|region| region.as_ref())
            .unwrap_or("<unset>")
    );

    sdk_config
}
