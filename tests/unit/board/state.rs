//! Tests for synchronous board mutations and their position invariants

#[cfg(test)]
mod tests {
    use moodboard::board::slot::{SlotFill, SlotId};
    use moodboard::board::state::{Board, LockChange, LockPolicy, SlotLimits};

    fn fills(prefix: &str, count: usize) -> Vec<SlotFill> {
        (0..count)
            .map(|i| SlotFill::fetched(format!("https://img.test/{prefix}/{i}.png"), format!("{prefix}-{i}")))
            .collect()
    }

    fn board_with(count: usize, policy: LockPolicy) -> Board {
        let mut board = Board::new(SlotLimits::default(), policy);
        board.reset(fills("init", count));
        board
    }

    fn ids(board: &Board) -> Vec<SlotId> {
        board.slots().iter().map(|slot| slot.id).collect()
    }

    fn id_at(board: &Board, index: usize) -> SlotId {
        board.slots()[index].id
    }

    // Tests reset yields sequential positions and unlocked slots
    // Verified by starting positions at one
    #[test]
    fn test_reset_positions() {
        for count in 1..=12 {
            let board = board_with(count, LockPolicy::Single);
            assert_eq!(board.len(), count);
            assert!(board.positions_consistent());
            assert!(board.slots().iter().all(|slot| !slot.is_locked));
        }
    }

    // Tests limits reject zero floors and inverted ranges
    // Verified by accepting min > max
    #[test]
    fn test_slot_limits_validation() {
        assert!(SlotLimits::new(0, 5).is_err());
        assert!(SlotLimits::new(6, 5).is_err());

        let limits = SlotLimits::new(2, 4).expect("valid limits");
        assert!(limits.contains(2));
        assert!(limits.contains(4));
        assert!(!limits.contains(1));
        assert!(!limits.contains(5));
        assert_eq!(SlotLimits::default().min(), 1);
        assert_eq!(SlotLimits::default().max(), 12);
    }

    // Tests locked slots survive replacement with identity and index intact
    // Verified by replacing every slot regardless of lock
    #[test]
    fn test_replace_unlocked_preserves_locked() {
        let mut board = board_with(5, LockPolicy::Multi);
        let locked_a = id_at(&board, 1);
        let locked_b = id_at(&board, 3);
        board.toggle_lock(locked_a);
        board.toggle_lock(locked_b);
        let before = board.slots().to_vec();

        let replaced = board.replace_unlocked(fills("next", 3));

        assert_eq!(replaced, 3);
        assert_eq!(board.len(), 5);
        assert!(board.positions_consistent());
        assert_eq!(board.slots()[1], before[1]);
        assert_eq!(board.slots()[3], before[3]);
        for index in [0, 2, 4] {
            let slot = &board.slots()[index];
            assert!(slot.tag.starts_with("next-"));
            assert!(before.iter().all(|old| old.id != slot.id));
        }
        // New slots fill the freed indices in order
        assert_eq!(board.slots()[0].tag, "next-0");
        assert_eq!(board.slots()[2].tag, "next-1");
        assert_eq!(board.slots()[4].tag, "next-2");
    }

    // Tests a short fill list leaves the remaining unlocked slots untouched
    // Verified by dropping slots without a fill
    #[test]
    fn test_replace_unlocked_short_fills() {
        let mut board = board_with(4, LockPolicy::Single);
        let before = board.slots().to_vec();

        let replaced = board.replace_unlocked(fills("next", 2));

        assert_eq!(replaced, 2);
        assert_eq!(board.len(), 4);
        assert_eq!(board.slots()[2], before[2]);
        assert_eq!(board.slots()[3], before[3]);
    }

    // Tests single-lock policy releases the previous lock
    // Verified by skipping the release loop
    #[test]
    fn test_single_lock_releases_previous() {
        let mut board = board_with(4, LockPolicy::Single);
        let first = id_at(&board, 0);
        let second = id_at(&board, 2);

        assert_eq!(
            board.toggle_lock(first),
            LockChange::Locked {
                tag: "init-0".to_string(),
                released: vec![],
            }
        );
        assert_eq!(
            board.toggle_lock(second),
            LockChange::Locked {
                tag: "init-2".to_string(),
                released: vec![first],
            }
        );
        assert_eq!(board.locked_tags(), vec!["init-2".to_string()]);
        assert_eq!(board.unlocked_count(), 3);
    }

    // Tests multi-lock policy keeps every lock
    // Verified by applying the single-lock release under multi
    #[test]
    fn test_multi_lock_keeps_all() {
        let mut board = board_with(4, LockPolicy::Multi);
        board.toggle_lock(id_at(&board, 0));
        board.toggle_lock(id_at(&board, 3));

        assert_eq!(
            board.locked_tags(),
            vec!["init-0".to_string(), "init-3".to_string()]
        );
    }

    // Tests double toggle restores lock state and content
    // Verified by clearing the tag on unlock
    #[test]
    fn test_toggle_idempotent() {
        let mut board = board_with(3, LockPolicy::Single);
        let before = board.slots().to_vec();
        let id = id_at(&board, 1);

        board.toggle_lock(id);
        assert_eq!(board.toggle_lock(id), LockChange::Unlocked);

        assert_eq!(board.slots(), before.as_slice());
    }

    // Tests unknown ids are ignored
    // Verified by locking the first slot on a miss
    #[test]
    fn test_toggle_unknown_id() {
        let mut board = board_with(3, LockPolicy::Single);
        let mut other = board_with(5, LockPolicy::Single);
        other.reset(fills("again", 5));
        let stranger = id_at(&other, 4);
        let before = board.slots().to_vec();

        assert_eq!(board.toggle_lock(stranger), LockChange::Unknown);
        assert_eq!(board.slots(), before.as_slice());
    }

    // Tests splice semantics rather than swap
    // Verified by swapping the two slots instead
    #[test]
    fn test_reorder_splice() {
        let mut board = board_with(4, LockPolicy::Single);
        let original = ids(&board);

        assert!(board.reorder(0, 2));

        assert_eq!(ids(&board), vec![original[1], original[2], original[0], original[3]]);
        assert!(board.positions_consistent());
    }

    // Tests reorder followed by its inverse restores order for adjacent and distant pairs
    // Verified by renumbering before the splice
    #[test]
    fn test_reorder_inverse() {
        let mut board = board_with(7, LockPolicy::Single);
        let original = ids(&board);

        for (from, to) in [(2, 3), (3, 2), (0, 6), (6, 0), (1, 4), (5, 2)] {
            assert!(board.reorder(from, to));
            assert!(board.reorder(to, from));
            assert_eq!(ids(&board), original);
        }
    }

    // Tests equal and out-of-range indices are no-ops
    // Verified by clamping the target index
    #[test]
    fn test_reorder_rejected() {
        let mut board = board_with(4, LockPolicy::Single);
        let before = board.slots().to_vec();

        assert!(!board.reorder(1, 1));
        assert!(!board.reorder(4, 0));
        assert!(!board.reorder(0, 4));
        assert!(!board.reorder(usize::MAX, 0));
        assert_eq!(board.slots(), before.as_slice());
    }

    // Tests push respects the ceiling and appends at the end
    // Verified by allowing one slot past the ceiling
    #[test]
    fn test_push_ceiling() {
        let limits = SlotLimits::new(1, 3).expect("valid limits");
        let mut board = Board::new(limits, LockPolicy::Single);
        board.reset(fills("init", 2));

        let id = board.push(SlotFill::fetched("https://img.test/x.png", "x"));
        assert!(id.is_some());
        assert_eq!(board.index_of(id.expect("pushed")), Some(2));
        assert!(board.is_full());

        assert_eq!(board.push(SlotFill::fetched("https://img.test/y.png", "y")), None);
        assert_eq!(board.len(), 3);
    }

    // Tests remove respects the floor and renumbers
    // Verified by skipping the renumbering
    #[test]
    fn test_remove_floor() {
        let mut board = board_with(3, LockPolicy::Single);
        let middle = id_at(&board, 1);

        assert!(board.remove(middle));
        assert!(board.get(middle).is_none());
        assert!(board.positions_consistent());
        assert!(!board.remove(middle));

        assert!(board.remove(id_at(&board, 0)));
        assert!(board.is_at_floor());
        assert!(!board.remove(id_at(&board, 0)));
        assert_eq!(board.len(), 1);
    }
}
