use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::response::WireResponse;

/// Outcome of one harness exchange: the response document the host would
/// receive, plus everything captured from the diagnostic stream.
#[derive(Serialize, Deserialize)]
pub struct ShimRunResult {
    pub handler: String,
    pub runtime: Duration,
    pub response: WireResponse,
    pub logs: String,
}

impl ShimRunResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|error| error.to_string())
    }
}

impl fmt::Display for ShimRunResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let title = "        Shim Exchange        ".black().on_bright_green();
        write!(f, "{}\n\n", title)?;
        writeln!(f, "Handler: {}", self.handler)?;
        writeln!(f, "Runtime: {:?}\n", self.runtime)?;

        writeln!(
            f,
            "{}\n\n{}",
            "            Logs             ".black().on_bright_blue(),
            self.logs
        )?;

        writeln!(
            f,
            "Response:\n{}",
            serde_json::to_string_pretty(&self.response).unwrap_or_else(|error| error.to_string())
        )?;

        Ok(())
    }
}
