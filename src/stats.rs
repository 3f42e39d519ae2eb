//! Run statistics reported alongside [`crate::MinifyOutput`].

use serde::{Deserialize, Serialize};

/// Summary counters for a single `minify` run, per the statistics list in
/// the orchestrator's contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub original_bytes: u32,
    pub emitted_bytes: u32,
    pub total_symbols: u32,
    pub live_symbols: u32,
    pub dead_symbols: u32,
    pub renamed_symbols: u32,
}
