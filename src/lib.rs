//! Guest-side SDK for single-shot sandboxed functions: one JSON request
//! document in on stdin, one handler call, one JSON response document out on
//! stdout. Diagnostics go to stderr.

pub mod logs;
pub mod request;
pub mod response;
pub mod run_result;
pub mod shim;

pub use request::{Headers, Request};
pub use response::{Response, WireResponse};
pub use shim::{run, run_from_streams};
