//! Full flow: register students, record attendance, mint, report.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rc_ledger::adapters::InMemoryStore;
    use rc_ledger::{DifficultyConfig, Ledger, LedgerConfig, LedgerEvent};
    use rc_minting::{AttendanceMinter, CancelToken, PowSolver};
    use rc_registrar::{query_attendance, query_event_attendance, InMemoryWallet, Registrar};
    use shared_types::TransactionKind;

    fn easy_ledger() -> Arc<Ledger> {
        let config = LedgerConfig {
            block_reward: 50,
            difficulty: DifficultyConfig {
                base_difficulty: u64::MAX,
                ..Default::default()
            },
        };
        Arc::new(Ledger::open(Arc::new(InMemoryStore::new()), config).unwrap())
    }

    fn actors(ledger: Arc<Ledger>) -> (Registrar, AttendanceMinter) {
        let registrar = Registrar::new(ledger.clone(), Arc::new(InMemoryWallet::new()));
        let minter = AttendanceMinter::new(ledger, Arc::new(PowSolver::new()), "teacher".into());
        (registrar, minter)
    }

    #[test]
    fn test_register_attend_mint_report() {
        crate::integration::init_tracing();
        let ledger = easy_ledger();
        let (registrar, minter) = actors(ledger.clone());

        registrar.register("alice").unwrap();
        registrar.register("bob").unwrap();
        registrar.record_attendance("alice", "lecture-1", 100).unwrap();
        registrar.record_attendance("bob", "lecture-1", 101).unwrap();

        let block = minter.mint(&CancelToken::new()).unwrap().unwrap();

        // Two attendance transactions plus the reward.
        assert_eq!(block.transactions.len(), 3);
        assert_eq!(
            block
                .transactions
                .iter()
                .filter(|tx| tx.kind == TransactionKind::Attendance)
                .count(),
            2
        );
        assert_eq!(ledger.block_count(), 2);

        // Registrations are not minted; they stay pooled.
        let pool = ledger.pending_transactions();
        assert_eq!(pool.len(), 2);
        assert!(pool
            .iter()
            .all(|tx| tx.kind == TransactionKind::StudentRegistration));

        // Reports see the committed records.
        let alice = query_attendance(&ledger, "alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].event_id, "lecture-1");
        assert_eq!(query_event_attendance(&ledger, "lecture-1").len(), 2);

        // The minter earned the subsidy.
        let unspent = ledger.unspent_outputs_for_address(Some("teacher"));
        assert_eq!(unspent.len(), 1);
        assert_eq!(unspent[0].amount, 50);
    }

    #[test]
    fn test_flow_emits_expected_events() {
        let ledger = easy_ledger();
        let (registrar, minter) = actors(ledger.clone());
        let mut rx = ledger.subscribe();

        registrar.register("alice").unwrap();
        registrar.record_attendance("alice", "lecture-1", 100).unwrap();
        minter.mint(&CancelToken::new()).unwrap().unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            LedgerEvent::StudentRegistered(_)
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            LedgerEvent::AttendanceRecorded(_)
        ));
        assert!(matches!(rx.try_recv().unwrap(), LedgerEvent::BlockAdded(_)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mint_against_a_real_target() {
        // 52 of the 56 measure bits as headroom keeps the solve fast while
        // still forcing an actual nonce search.
        let config = LedgerConfig {
            block_reward: 50,
            difficulty: DifficultyConfig {
                base_difficulty: 1 << 52,
                ..Default::default()
            },
        };
        let ledger =
            Arc::new(Ledger::open(Arc::new(InMemoryStore::new()), config).unwrap());
        let (registrar, minter) = actors(ledger.clone());

        registrar.register("alice").unwrap();
        registrar.record_attendance("alice", "lecture-1", 100).unwrap();

        let block = minter.mint(&CancelToken::new()).unwrap().unwrap();
        assert!(block.measured_difficulty() <= 1 << 52);
        assert_eq!(block.difficulty, Some(1 << 52));
        assert_eq!(ledger.last_block().hash, block.hash);
    }

    #[test]
    fn test_second_mint_without_new_attendance_is_a_noop() {
        let ledger = easy_ledger();
        let (registrar, minter) = actors(ledger.clone());

        registrar.register("alice").unwrap();
        registrar.record_attendance("alice", "lecture-1", 100).unwrap();
        minter.mint(&CancelToken::new()).unwrap().unwrap();

        assert!(minter.mint(&CancelToken::new()).unwrap().is_none());
        assert_eq!(ledger.block_count(), 2);
    }
}
