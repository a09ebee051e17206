//! buckets command - List buckets visible to the account

use std::io::Write;

use sn_core::{Connection, Connector, Credentials, Result, SessionConfig};

/// Execute the buckets command
pub async fn execute<W: Write>(
    config: &SessionConfig,
    connector: &dyn Connector,
    out: &mut W,
) -> Result<()> {
    config.validate_credentials()?;
    let credentials = Credentials::new(config.access_key.clone(), config.secret_key.clone());
    let connection = Connection::open(connector, credentials).await?;

    for bucket in connection.list_buckets().await? {
        writeln!(out, "{}", bucket.key)?;
    }
    Ok(())
}
