//! services/gateway/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 specification for the REST API and
//! saves it to a file (`openapi.json` by default, or the path given as the
//! first argument).

use gateway_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, spec_json)?;
    println!("OpenAPI specification generated at {}", path);
    Ok(())
}
