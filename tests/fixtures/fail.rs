use anyhow::{bail, Result};
use function_shim::{Request, Response};

fn main() -> Result<()> {
    function_shim::run(handler)
}

fn handler(_request: Request) -> Result<Response> {
    bail!("boom");
}
