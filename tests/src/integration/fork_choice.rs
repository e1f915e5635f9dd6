//! Chain replacement scenarios.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rc_ledger::adapters::InMemoryStore;
    use rc_ledger::{DifficultyConfig, Ledger, LedgerConfig, LedgerError, LedgerEvent};
    use shared_crypto::random_id;
    use shared_types::{
        AttendancePayload, Block, Transaction, TransactionData, TransactionKind,
    };

    const EASY: u64 = u64::MAX;

    fn easy_ledger() -> Arc<Ledger> {
        let config = LedgerConfig {
            block_reward: 50,
            difficulty: DifficultyConfig {
                base_difficulty: EASY,
                ..Default::default()
            },
        };
        Arc::new(Ledger::open(Arc::new(InMemoryStore::new()), config).unwrap())
    }

    fn attendance_tx(student_id: &str, event_id: &str) -> Transaction {
        Transaction {
            id: random_id(),
            kind: TransactionKind::Attendance,
            data: TransactionData::Attendance(AttendancePayload {
                student_id: student_id.into(),
                event_id: event_id.into(),
                timestamp: 1_700_000_000,
                signature: "ab".repeat(64),
                public_key: "cd".repeat(32),
            }),
            hash: None,
            signature: None,
        }
    }

    fn sealed_block(previous: &Block, transactions: Vec<Transaction>) -> Block {
        let mut block = Block {
            index: previous.index + 1,
            previous_hash: previous.hash.clone(),
            timestamp: previous.timestamp + 600,
            nonce: 0,
            difficulty: None,
            transactions,
            miner: None,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Chain of `extra` empty blocks on top of genesis.
    fn build_chain(extra: usize) -> Vec<Block> {
        let mut chain = vec![Block::genesis()];
        for i in 0..extra {
            let block = sealed_block(
                chain.last().unwrap(),
                vec![attendance_tx(&format!("s-{i}"), "shared")],
            );
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_longer_fork_replaces_divergent_suffix() {
        let ledger = easy_ledger();
        let mut rx = ledger.subscribe();

        // Shared history: genesis plus three blocks.
        let shared = build_chain(3);
        for block in shared.iter().skip(1) {
            ledger.add_block(block.clone(), false).unwrap();
        }

        // Local tip (chain length 5).
        let local_tip = sealed_block(shared.last().unwrap(), vec![attendance_tx("local", "l")]);
        ledger.add_block(local_tip.clone(), false).unwrap();
        assert_eq!(ledger.block_count(), 5);

        // Remote fork of length 6 sharing the first four blocks.
        let remote_a = sealed_block(shared.last().unwrap(), vec![attendance_tx("remote", "r")]);
        let remote_b = sealed_block(&remote_a, vec![]);
        let mut candidate = shared.clone();
        candidate.push(remote_a.clone());
        candidate.push(remote_b.clone());

        let appended = ledger.replace_chain(candidate).unwrap();

        // Exactly the two diverging blocks land; the local tip is gone.
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].hash, remote_a.hash);
        assert_eq!(appended[1].hash, remote_b.hash);
        assert_eq!(ledger.block_count(), 6);
        assert_eq!(ledger.last_block().hash, remote_b.hash);
        assert!(ledger.get_block_by_hash(&local_tip.hash).is_none());

        // One aggregate notification, nothing per block.
        match rx.try_recv().unwrap() {
            LedgerEvent::ChainReplaced(blocks) => assert_eq!(blocks.len(), 2),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_equal_length_candidate_rejected() {
        let ledger = easy_ledger();
        let chain = build_chain(2);
        for block in chain.iter().skip(1) {
            ledger.add_block(block.clone(), false).unwrap();
        }

        let err = ledger.replace_chain(chain).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ChainTooShort {
                candidate: 3,
                current: 3
            }
        ));
    }

    #[test]
    fn test_tampered_candidate_rejected_without_mutation() {
        let ledger = easy_ledger();
        let before = ledger.all_blocks();

        let mut candidate = build_chain(3);
        // Break linkage in the middle of the candidate.
        candidate[2].previous_hash = "00".repeat(32);
        candidate[2].hash = candidate[2].compute_hash();

        let err = ledger.replace_chain(candidate).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSequence { .. }));
        assert_eq!(ledger.all_blocks(), before);
    }

    #[test]
    fn test_candidate_with_foreign_genesis_rejected() {
        let ledger = easy_ledger();

        let mut genesis = Block::genesis();
        genesis.timestamp += 1;
        genesis.hash = genesis.compute_hash();
        let fork = sealed_block(&genesis, vec![]);

        let err = ledger.replace_chain(vec![genesis, fork]).unwrap_err();
        assert!(matches!(err, LedgerError::GenesisMismatch));
    }
}
