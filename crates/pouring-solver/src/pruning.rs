//! Move enumeration and the pruning rule used when extending paths.
//!
//! The catalog lists every legal move for a glass count. When a path is
//! extended, its own last move is skipped; a repeated move is always a
//! no-op. Longer cycles are not pruned.

use crate::puzzle::Move;

/// Every legal move for `glass_count` glasses.
///
/// Order: all `Empty` by glass, all `Fill` by glass, then `Pour(from, to)`
/// in lexicographic order with `from != to`. `glass_count^2 + glass_count`
/// moves in total.
pub fn all_moves(glass_count: usize) -> Vec<Move> {
    let mut moves = Vec::with_capacity(glass_count * glass_count + glass_count);
    moves.extend((0..glass_count).map(Move::Empty));
    moves.extend((0..glass_count).map(Move::Fill));
    for from in 0..glass_count {
        for to in (0..glass_count).filter(|&to| to != from) {
            moves.push(Move::Pour(from, to));
        }
    }
    moves
}

/// Check if `next` may directly follow `last`
pub fn is_banned_pair(last: &Move, next: &Move) -> bool {
    last == next
}

/// Moves from `catalog` allowed after `last`, in catalog order
pub fn valid_moves_after<'a>(
    catalog: &'a [Move],
    last: Option<&'a Move>,
) -> impl Iterator<Item = Move> + 'a {
    catalog
        .iter()
        .filter(move |mv| !last.is_some_and(|prev| is_banned_pair(prev, mv)))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order() {
        let moves = all_moves(3);
        assert_eq!(
            moves,
            vec![
                Move::Empty(0),
                Move::Empty(1),
                Move::Empty(2),
                Move::Fill(0),
                Move::Fill(1),
                Move::Fill(2),
                Move::Pour(0, 1),
                Move::Pour(0, 2),
                Move::Pour(1, 0),
                Move::Pour(1, 2),
                Move::Pour(2, 0),
                Move::Pour(2, 1),
            ]
        );
    }

    #[test]
    fn test_single_glass_catalog() {
        assert_eq!(all_moves(1), vec![Move::Empty(0), Move::Fill(0)]);
        assert!(all_moves(0).is_empty());
    }

    #[test]
    fn test_last_move_is_skipped() {
        let catalog = all_moves(3);
        let after: Vec<Move> = valid_moves_after(&catalog, Some(&Move::Pour(1, 0))).collect();
        assert_eq!(after.len(), catalog.len() - 1);
        assert!(!after.contains(&Move::Pour(1, 0)));
        // The reverse pour is a different move
        assert!(after.contains(&Move::Pour(0, 1)));

        let all: Vec<Move> = valid_moves_after(&catalog, None).collect();
        assert_eq!(all, catalog);
    }

    proptest! {
        #[test]
        fn prop_catalog_size_and_uniqueness(n in 1usize..=8) {
            let moves = all_moves(n);
            prop_assert_eq!(moves.len(), n * n + n);

            let unique: HashSet<Move> = moves.iter().copied().collect();
            prop_assert_eq!(unique.len(), moves.len());

            for mv in &moves {
                prop_assert!(mv.validate(n).is_ok());
            }
        }
    }
}
