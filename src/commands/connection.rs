// ABOUTME: Fabric connection setup shared by deploy and status commands.
// ABOUTME: Acquires an access token and builds the retrying API client.

use fabdeploy::auth::{ClientSecretCredential, TokenProvider};
use fabdeploy::config::Connection;
use fabdeploy::error::Result;
use fabdeploy::fabric::{FabricClient, HttpTransport};
use fabdeploy::output::Output;

/// Authenticate and build a client for the connection's API base.
pub async fn connect(connection: &Connection, output: &Output) -> Result<FabricClient<HttpTransport>> {
    output.progress("  → Acquiring access token...");
    let credential = ClientSecretCredential::new(connection.credentials.clone())?
        .with_authority(connection.settings.authority.clone());
    let token = credential.token().await?;

    let transport = HttpTransport::new()?;
    Ok(
        FabricClient::new(transport, connection.settings.api_base.clone(), token)
            .with_retry(connection.settings.retry),
    )
}
