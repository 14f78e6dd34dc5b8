//! Print the OpenAPI document of otp-server as JSON.

use anyhow::Result;
use otp_server::docs::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
