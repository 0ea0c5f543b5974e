//! Script storage backed by `object_store`

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use glueetl_core::ScriptLocation;
use object_store::aws::{AmazonS3Builder, AwsCredential, AwsCredentialProvider};
use object_store::path::Path as ObjectPath;
use object_store::{CredentialProvider, ObjectStore, PutPayload};
use std::sync::Arc;
use tracing::debug;

use crate::ScriptStore;
use crate::error::{ClientError, Result};

/// [`ScriptStore`] writing to S3
///
/// A store is built per upload because the bucket comes from the script
/// location. Endpoint settings are read from the `AWS_*` environment
/// variables; credentials and region come from the [`SdkConfig`] when one
/// is given.
#[derive(Debug, Clone, Default)]
pub struct S3ScriptStore {
    region: Option<String>,
    credentials: Option<SharedCredentialsProvider>,
}

impl S3ScriptStore {
    /// Create a store using only the `AWS_*` environment variables
    ///
    /// # Arguments
    /// * `region` - Overrides the region from the environment
    pub fn new(region: Option<String>) -> Self {
        Self {
            region,
            credentials: None,
        }
    }

    /// Create a store sharing the region and credential chain of `sdk_config`
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self {
            region: sdk_config.region().map(|region| region.as_ref().to_string()),
            credentials: sdk_config.credentials_provider(),
        }
    }

    fn store_for(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = &self.region {
            builder = builder.with_region(region);
        }
        if let Some(provider) = &self.credentials {
            let credentials: AwsCredentialProvider = Arc::new(SdkCredentials {
                provider: provider.clone(),
            });
            builder = builder.with_credentials(credentials);
        }

        let store = builder
            .build()
            .map_err(|e| ClientError::ObjectStore(format!("S3: {e}")))?;

        Ok(Arc::new(store))
    }
}

/// Credentials for `object_store` drawn from the AWS SDK provider chain
#[derive(Debug)]
struct SdkCredentials {
    provider: SharedCredentialsProvider,
}

#[async_trait]
impl CredentialProvider for SdkCredentials {
    type Credential = AwsCredential;

    async fn get_credential(&self) -> object_store::Result<Arc<AwsCredential>> {
        let credentials = self
            .provider
            .provide_credentials()
            .await
            .map_err(|e| object_store::Error::Generic {
                store: "S3",
                source: Box::new(e),
            })?;

        Ok(Arc::new(AwsCredential {
            key_id: credentials.access_key_id().to_string(),
            secret_key: credentials.secret_access_key().to_string(),
            token: credentials.session_token().map(str::to_string),
        }))
    }
}

/// Object path for the key of `location`, keeping every segment as written
fn object_path(location: &ScriptLocation) -> Result<ObjectPath> {
    ObjectPath::parse(location.key()).map_err(|e| {
        ClientError::ObjectStore(format!("invalid object key `{}`: {e}", location.key()))
    })
}

/// Unconditional put; the last writer wins
async fn put_object(store: &dyn ObjectStore, path: &ObjectPath, body: Vec<u8>) -> Result<()> {
    store.put(path, PutPayload::from(body)).await?;
    Ok(())
}

#[async_trait]
impl ScriptStore for S3ScriptStore {
    async fn upload(&self, location: &ScriptLocation, body: Vec<u8>) -> Result<()> {
        location
            .require_scheme("s3")
            .map_err(|e| ClientError::ObjectStore(e.to_string()))?;

        let path = object_path(location)?;
        let store = self.store_for(location.bucket())?;

        debug!(
            "Uploading {} bytes to bucket {} key {}",
            body.len(),
            location.bucket(),
            path
        );

        put_object(store.as_ref(), &path, body).await
    }
}
