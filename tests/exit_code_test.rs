/*!
 * Exit Code Property Tests
 * The aggregate code depends on positions, never on finish order
 */

mod common;

use common::{test_config, ScriptedHost, Step};
use proptest::prelude::*;
use procwarden::{cli, ExitCodeTracker, Supervisor};

const PROGRAMS: [&str; 8] = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7"];

fn statuses_and_order() -> impl Strategy<Value = (Vec<i32>, Vec<usize>)> {
    prop::collection::vec(prop_oneof![3 => Just(0), 1 => 1i32..=255], 1..=PROGRAMS.len())
        .prop_flat_map(|statuses| {
            let order: Vec<usize> = (0..statuses.len()).collect();
            (Just(statuses), Just(order).prop_shuffle())
        })
}

fn expected(statuses: &[i32]) -> i32 {
    statuses.iter().copied().find(|s| *s != 0).unwrap_or(0)
}

proptest! {
    #[test]
    fn tracker_picks_lowest_index_failure((statuses, order) in statuses_and_order()) {
        let mut tracker = ExitCodeTracker::new();
        for index in order {
            tracker.record(index, statuses[index]);
        }
        prop_assert_eq!(tracker.code(), expected(&statuses));
    }

    #[test]
    fn supervisor_exit_code_ignores_finish_order((statuses, order) in statuses_and_order()) {
        let mut words = Vec::new();
        for (i, program) in PROGRAMS.iter().take(statuses.len()).enumerate() {
            if i > 0 {
                words.push(cli::SEPARATOR.to_string());
            }
            words.push(program.to_string());
        }
        let invocation = cli::parse(&words, false).unwrap();

        let script = order
            .iter()
            .map(|&index| Step::Exit(PROGRAMS[index], statuses[index]))
            .collect();
        let mut supervisor = Supervisor::new(ScriptedHost::new(script), test_config());

        prop_assert_eq!(supervisor.run(invocation).unwrap(), expected(&statuses));
    }
}
