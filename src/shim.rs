use std::any::Any;
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result};
use serde_json::json;

use crate::request::Request;
use crate::response::Response;

pub(crate) const RUNTIME_ERROR_LABEL: &str = "Rust Runtime Error";

/// Runs one request/response exchange over the process's standard streams.
///
/// Reads stdin to end-of-stream, invokes `handler` exactly once, and writes
/// exactly one response document to stdout, whatever the input looked like
/// and however the handler ended. An error return or a panic in the handler
/// is trapped into a status-500 response and one diagnostic line on stderr.
///
/// Returns an error only when the final output write fails; that one is the
/// caller's to surface, typically by returning it from `main`.
pub fn run<H>(handler: H) -> Result<()>
where
    H: FnOnce(Request) -> Result<Response>,
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    run_from_streams(handler, stdin.lock(), stdout.lock(), stderr.lock())
}

/// [`run`] over caller-supplied streams.
///
/// The harness and the test suite feed in-memory buffers through this to
/// observe a full exchange without a child process.
pub fn run_from_streams<H, I, O, D>(
    handler: H,
    mut input: I,
    mut output: O,
    mut diagnostics: D,
) -> Result<()>
where
    H: FnOnce(Request) -> Result<Response>,
    I: Read,
    O: Write,
    D: Write,
{
    let trapped = read_request(&mut input)
        .map_err(|error| format!("failed to read request stream: {error}"))
        .and_then(|request| invoke(handler, request));

    let response = match trapped {
        Ok(response) => response,
        Err(message) => {
            writeln!(diagnostics, "{RUNTIME_ERROR_LABEL}: {message}").ok();
            error_response(&message)
        }
    };

    let document = response.into_wire()?.to_json()?;
    output
        .write_all(document.as_bytes())
        .context("failed to write response stream")?;
    output.flush().context("failed to flush response stream")?;
    Ok(())
}

fn read_request<I: Read>(input: &mut I) -> io::Result<Request> {
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;
    Ok(Request::from_raw_input(&raw))
}

// Calls the handler inside an unwind trap, reducing error returns and panic
// payloads alike to the message used for the diagnostic line and the error
// body. Stack context is discarded.
fn invoke<H>(handler: H, request: Request) -> Result<Response, String>
where
    H: FnOnce(Request) -> Result<Response>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| handler(request))) {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(error)) => Err(format!("{error:#}")),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn error_response(message: &str) -> Response {
    Response::new().status(500).json(json!({
        "error": RUNTIME_ERROR_LABEL,
        "message": message,
    }))
}
