use anyhow::Result;
use function_shim::{Request, Response};
use serde_json::json;

fn main() -> Result<()> {
    function_shim::run(handler)
}

fn handler(request: Request) -> Result<Response> {
    eprintln!("handling a {} request", request.method()?);

    let headers = request.headers()?;
    let user_agent = headers.get("User-Agent").unwrap_or("Unknown").to_string();

    Ok(Response::new()
        .header("X-Guest-Lang", "rust")
        .json(json!({
            "message": "Hello from the guest",
            "your_method": request.method()?,
            "your_agent": user_agent,
            "your_body": request.body()?,
        })))
}
