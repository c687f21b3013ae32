/*!
 * Exit Code Aggregation
 *
 * The representative exit code is the nonzero status of the watched command
 * with the lowest position in the command set, whatever order the commands
 * actually finish in. Zero when none failed.
 */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitCodeTracker {
    winner: Option<(usize, i32)>,
}

impl ExitCodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for the command at `index` exiting with `status`.
    ///
    /// Returns `true` when this status becomes the recorded code.
    pub fn record(&mut self, index: usize, status: i32) -> bool {
        if status == 0 {
            return false;
        }

        match self.winner {
            Some((current, _)) if current <= index => false,
            _ => {
                self.winner = Some((index, status));
                true
            }
        }
    }

    pub fn code(&self) -> i32 {
        self.winner.map_or(0, |(_, status)| status)
    }

    /// Position of the command that supplied the current code
    pub fn winner_index(&self) -> Option<usize> {
        self.winner.map(|(index, _)| index)
    }
}
