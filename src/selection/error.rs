use std::time::Duration;

use thiserror::Error;

use crate::ident::DeskId;

/// Why a block could not be solved.
///
/// Never fatal for a run: the block is recorded as failed and every other
/// block proceeds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("solver timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },

    #[error("no selection satisfies the constraints")]
    Infeasible,

    #[error("candidate references desk {0} which is not in the floor plan")]
    UnknownDesk(DeskId),

    #[error("solver backend failed: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_includes_elapsed() {
        let e = SolveError::TimedOut {
            elapsed: Duration::from_millis(250),
        };
        assert_eq!(e.to_string(), "solver timed out after 250ms");
    }

    #[test]
    fn backend_display() {
        let e = SolveError::Backend("numerical trouble".to_string());
        assert_eq!(e.to_string(), "solver backend failed: numerical trouble");
    }
}
