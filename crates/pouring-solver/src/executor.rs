//! State transitions: applying moves and folding paths.
//!
//! Every function here is pure. A state is never modified in place; each
//! move produces a fresh `State`.

use crate::error::Result;
use crate::puzzle::{Glasses, Move, State};

/// Metrics collected while folding a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionMetrics {
    pub moves: usize,
    pub fills: usize,
    pub empties: usize,
    pub pours: usize,
    /// Total quantity moved between glasses by pours
    pub volume_poured: u64,
    /// Moves whose resulting state equals their input state
    pub wasted_moves: usize,
}

/// Result of running a path
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub state: State,
    pub metrics: ExecutionMetrics,
    pub solved: bool,
}

/// Apply one move to a state.
///
/// The move must be valid for `glasses` (see [`Move::validate`]); an
/// out-of-range glass index panics.
pub fn apply(glasses: &Glasses, state: &State, mv: Move) -> State {
    let mut changed = state.clone();
    match mv {
        Move::Empty(glass) => {
            changed[glass] = 0;
        }
        Move::Fill(glass) => {
            changed[glass] = glasses.capacity(glass);
        }
        Move::Pour(from, to) => {
            let avail_qty = state[from];
            let avail_cap = glasses.capacity(to) - state[to];
            if avail_qty >= avail_cap {
                changed[from] = avail_qty - avail_cap;
                changed[to] = glasses.capacity(to);
            } else {
                changed[from] = 0;
                changed[to] = state[to] + avail_qty;
            }
        }
    }
    changed
}

/// Validate the move against the glass count, then apply it.
pub fn try_apply(glasses: &Glasses, state: &State, mv: Move) -> Result<State> {
    mv.validate(glasses.count())?;
    Ok(apply(glasses, state, mv))
}

/// Fold a path over the all-empty initial state.
pub fn execute(glasses: &Glasses, path: &[Move]) -> State {
    path.iter()
        .fold(glasses.initial_state(), |state, &mv| apply(glasses, &state, mv))
}

/// Whether any glass holds exactly `target`
pub fn reaches_target(state: &[u32], target: u32) -> bool {
    state.contains(&target)
}

/// Fold a path and collect metrics along the way
pub fn execute_with_metrics(glasses: &Glasses, path: &[Move], target: u32) -> ExecutionResult {
    let mut state = glasses.initial_state();
    let mut metrics = ExecutionMetrics::default();

    for &mv in path {
        let next = apply(glasses, &state, mv);
        metrics.moves += 1;
        match mv {
            Move::Empty(_) => metrics.empties += 1,
            Move::Fill(_) => metrics.fills += 1,
            Move::Pour(_, to) => {
                metrics.pours += 1;
                metrics.volume_poured += u64::from(next[to] - state[to]);
            }
        }
        if next == state {
            metrics.wasted_moves += 1;
        }
        state = next;
    }

    let solved = reaches_target(&state, target);
    ExecutionResult {
        state,
        metrics,
        solved,
    }
}

/// Simple verification: does the path reach the target?
pub fn verify_solution(glasses: &Glasses, path: &[Move], target: u32) -> bool {
    reaches_target(&execute(glasses, path), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    #[test]
    fn test_fill_and_empty() {
        let glasses = Glasses::classic();
        let state = glasses.initial_state();

        let filled = apply(&glasses, &state, Move::Fill(1));
        assert_eq!(filled.as_slice(), &[0, 5, 0]);

        let emptied = apply(&glasses, &filled, Move::Empty(1));
        assert_eq!(emptied.as_slice(), &[0, 0, 0]);

        // Input state untouched
        assert_eq!(state.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_pour_overflow_and_absorb() {
        let glasses = Glasses::classic();

        // 5 into an empty 3: overflows
        let state: State = smallvec![0, 5, 0];
        let poured = apply(&glasses, &state, Move::Pour(1, 0));
        assert_eq!(poured.as_slice(), &[3, 2, 0]);

        // 3 into an empty 9: absorbed
        let state: State = smallvec![3, 0, 0];
        let poured = apply(&glasses, &state, Move::Pour(0, 2));
        assert_eq!(poured.as_slice(), &[0, 0, 3]);

        // Exactly fits
        let state: State = smallvec![0, 5, 4];
        let poured = apply(&glasses, &state, Move::Pour(1, 2));
        assert_eq!(poured.as_slice(), &[0, 0, 9]);

        // Into a full glass
        let state: State = smallvec![3, 0, 9];
        let poured = apply(&glasses, &state, Move::Pour(0, 2));
        assert_eq!(poured.as_slice(), &[3, 0, 9]);
    }

    #[test]
    fn test_execute_path() {
        let glasses = Glasses::classic();
        assert_eq!(execute(&glasses, &[]).as_slice(), &[0, 0, 0]);

        let path = vec![Move::Fill(0), Move::Pour(0, 2)];
        assert_eq!(execute(&glasses, &path).as_slice(), &[0, 0, 3]);

        let path = vec![
            Move::Fill(1),
            Move::Pour(1, 0),
            Move::Pour(1, 2),
            Move::Fill(1),
            Move::Pour(1, 2),
        ];
        assert_eq!(execute(&glasses, &path).as_slice(), &[3, 0, 7]);
        assert!(verify_solution(&glasses, &path, 7));
        assert!(!verify_solution(&glasses, &path, 4));
    }

    #[test]
    fn test_try_apply_rejects_invalid_moves() {
        let glasses = Glasses::classic();
        let state = glasses.initial_state();

        assert!(try_apply(&glasses, &state, Move::Fill(3)).is_err());
        assert!(try_apply(&glasses, &state, Move::Pour(2, 2)).is_err());
        assert_eq!(
            try_apply(&glasses, &state, Move::Fill(2)).unwrap().as_slice(),
            &[0, 0, 9]
        );
    }

    #[test]
    fn test_execute_with_metrics() {
        let glasses = Glasses::classic();
        let path = vec![
            Move::Fill(1),
            Move::Pour(1, 0),
            Move::Pour(1, 2),
            Move::Empty(1),
            Move::Fill(1),
            Move::Pour(1, 2),
        ];

        let result = execute_with_metrics(&glasses, &path, 7);
        assert!(result.solved);
        assert_eq!(result.state.as_slice(), &[3, 0, 7]);
        assert_eq!(result.metrics.moves, 6);
        assert_eq!(result.metrics.fills, 2);
        assert_eq!(result.metrics.empties, 1);
        assert_eq!(result.metrics.pours, 3);
        assert_eq!(result.metrics.volume_poured, 3 + 2 + 5);
        // Emptying an already empty glass changes nothing
        assert_eq!(result.metrics.wasted_moves, 1);
    }

    /// Capacities together with a valid state for them
    fn glasses_and_state() -> impl Strategy<Value = (Glasses, State)> {
        prop::collection::vec(1u32..=20, 1..=5).prop_flat_map(|caps| {
            let levels: Vec<_> = caps.iter().map(|&c| 0..=c).collect();
            (Just(caps), levels).prop_map(|(caps, levels)| {
                let glasses = Glasses::new(caps).unwrap();
                let state: State = levels.into_iter().collect();
                (glasses, state)
            })
        })
    }

    fn any_move(glass_count: usize) -> impl Strategy<Value = Move> {
        let pour = (0..glass_count, 0..glass_count)
            .prop_filter("distinct glasses", |(from, to)| from != to)
            .prop_map(|(from, to)| Move::Pour(from, to));
        if glass_count > 1 {
            prop_oneof![
                (0..glass_count).prop_map(Move::Empty),
                (0..glass_count).prop_map(Move::Fill),
                pour,
            ]
            .boxed()
        } else {
            prop_oneof![
                (0..glass_count).prop_map(Move::Empty),
                (0..glass_count).prop_map(Move::Fill),
            ]
            .boxed()
        }
    }

    fn case() -> impl Strategy<Value = (Glasses, State, Move)> {
        glasses_and_state().prop_flat_map(|(glasses, state)| {
            let mv = any_move(glasses.count());
            (Just(glasses), Just(state), mv)
        })
    }

    proptest! {
        #[test]
        fn prop_apply_keeps_levels_within_capacity((glasses, state, mv) in case()) {
            let next = apply(&glasses, &state, mv);
            prop_assert!(glasses.is_valid_state(&next));
        }

        #[test]
        fn prop_volume_changes_only_where_expected((glasses, state, mv) in case()) {
            let next = apply(&glasses, &state, mv);
            let before: u32 = state.iter().sum();
            let after: u32 = next.iter().sum();
            match mv {
                Move::Pour(..) => prop_assert_eq!(before, after),
                Move::Fill(g) | Move::Empty(g) => {
                    let expected = if matches!(mv, Move::Fill(_)) { glasses.capacity(g) } else { 0 };
                    prop_assert_eq!(next[g], expected);
                    for i in glasses.indices().filter(|&i| i != g) {
                        prop_assert_eq!(next[i], state[i]);
                    }
                }
            }
        }

        #[test]
        fn prop_fill_and_empty_are_idempotent((glasses, state, mv) in case()) {
            if let Move::Fill(_) | Move::Empty(_) = mv {
                let once = apply(&glasses, &state, mv);
                let twice = apply(&glasses, &once, mv);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
