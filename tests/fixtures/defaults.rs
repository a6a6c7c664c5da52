use anyhow::Result;
use function_shim::{Request, Response};

fn main() -> Result<()> {
    function_shim::run(handler)
}

// Returns nothing at all; the adapter fills in every default.
fn handler(_request: Request) -> Result<Response> {
    Ok(Response::new())
}
