// src/pipeline/stage.rs

//! The three-way version comparison driving every pipeline stage.
//!
//! Each stage compares the version that is *available* to it (upstream
//! revision for fetch, fetched revision for convert, converted revision
//! for publish) against the version it last *produced*. The same decision
//! table serves all three stages.

/// Outcome of comparing an available version against a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDecision {
    /// Nothing is available to work from (version unset).
    Unavailable,
    /// The stored result is ahead of what is available; running would
    /// regress, so the stage must refuse.
    Regressed,
    /// Stored result already matches the available version.
    UpToDate,
    /// The available version is newer; the stage should run.
    Outdated,
}

/// Compare versions. `available < 0` means "nothing there yet"; forcing a
/// stage is done by passing `stored = -1`.
pub fn decide(available: i64, stored: i64) -> StageDecision {
    if available < 0 {
        StageDecision::Unavailable
    } else if available < stored {
        StageDecision::Regressed
    } else if available == stored {
        StageDecision::UpToDate
    } else {
        StageDecision::Outdated
    }
}
