//! Pipeline entry points for relay operations.
//!
//! - `run_once`: Fetch every source, deliver new posts, persist state
//! - `run_latest`: Fetch every source without delivery or state writes

pub mod dispatch;

pub use dispatch::{run_latest, run_once};
