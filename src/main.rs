use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;
use serde_json::json;

use function_shim::logs::DiagnosticLog;
use function_shim::response::WireResponse;
use function_shim::run_result::ShimRunResult;
use function_shim::{run_from_streams, Request, Response};

/// Local harness for guest handlers: feeds one request document through the
/// stdin/stdout exchange and reports what the host would see.
#[derive(Parser)]
#[clap(version)]
struct Opts {
    /// Path to a JSON request file; reads stdin when omitted
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// Built-in handler to exercise
    #[clap(long, value_enum, default_value = "echo")]
    handler: DemoHandler,

    /// Log the run result as a JSON object
    #[clap(long)]
    json: bool,
}

/// Built-in demo handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DemoHandler {
    /// Reflects the request back in a JSON body.
    Echo,
    /// Panics unconditionally, exercising the trapped 500 path.
    Fail,
}

impl DemoHandler {
    fn name(self) -> &'static str {
        match self {
            DemoHandler::Echo => "echo",
            DemoHandler::Fail => "fail",
        }
    }
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();
    let input = read_input(&opts)?;

    let mut output: Vec<u8> = Vec::new();
    let mut logs = DiagnosticLog::default();

    let start = Instant::now();
    match opts.handler {
        DemoHandler::Echo => run_from_streams(echo, input.as_slice(), &mut output, &mut logs)?,
        DemoHandler::Fail => run_from_streams(fail, input.as_slice(), &mut output, &mut logs)?,
    }
    let runtime = start.elapsed();

    let response: WireResponse = serde_json::from_slice(&output)
        .map_err(|e| anyhow!("Couldn't decode the response document: {}", e))?;

    let result = ShimRunResult {
        handler: opts.handler.name().to_string(),
        runtime,
        response,
        logs: logs.into_report(),
    };

    if opts.json {
        println!("{}", result.to_json());
    } else {
        println!("{result}");
    }

    Ok(())
}

fn read_input(opts: &Opts) -> Result<Vec<u8>> {
    match &opts.input {
        Some(path) => fs::read(path).map_err(|e| anyhow!("Couldn't load input {:?}: {}", path, e)),
        None => {
            if io::stdin().is_terminal() {
                bail!("You must provide input via the --input flag or piped via stdin.");
            }
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

// The harness captures only what the adapter writes to its diagnostic
// stream; anything a handler prints with eprintln! goes straight to the
// harness's own stderr. The built-in handlers stay silent for that reason.
fn echo(request: Request) -> Result<Response> {
    let body = json!({
        "message": "Hello from the shim harness",
        "your_method": request.method()?,
        "your_uri": request.uri().ok(),
        "your_body": request.body()?,
        "trace_id": request.trace_id(),
    });
    Ok(Response::new().header("X-Shim-Handler", "echo").json(body))
}

fn fail(_request: Request) -> Result<Response> {
    panic!("demo handler failure");
}
