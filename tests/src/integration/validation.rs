//! Admission rule rejections observed through the public ledger API.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rc_ledger::adapters::InMemoryStore;
    use rc_ledger::{DifficultyConfig, Ledger, LedgerConfig, LedgerError};
    use shared_crypto::random_id;
    use shared_types::{
        Block, RegistrationPayload, Transaction, TransactionData, TransactionKind, TxInput,
        TxOutput,
    };

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

    fn value_tx(kind: TransactionKind, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Transaction {
        let mut tx = Transaction {
            id: random_id(),
            kind,
            data: TransactionData::Value { inputs, outputs },
            hash: None,
            signature: None,
        };
        tx.hash = Some(tx.compute_hash());
        tx
    }

    fn input(transaction: &str, index: u64, amount: u64) -> TxInput {
        TxInput {
            transaction: transaction.into(),
            index,
            amount,
            address: "alice".into(),
            signature: None,
        }
    }

    fn output(amount: u64, address: &str) -> TxOutput {
        TxOutput {
            amount,
            address: address.into(),
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

    #[test]
    fn test_underfunded_block_reports_both_sums() {
        let ledger = easy_ledger();
        let tx = value_tx(
            TransactionKind::Transfer,
            vec![input("t0", 0, 10)],
            vec![output(100, "bob")],
        );
        let block = sealed_block(&ledger.last_block(), vec![tx]);

        match ledger.add_block(block, false).unwrap_err() {
            LedgerError::InsufficientBalance { inputs, outputs } => {
                // 10 from the input plus the 50 subsidy.
                assert_eq!(inputs, 60);
                assert_eq!(outputs, 100);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
        assert_eq!(ledger.block_count(), 1);
    }

    #[test]
    fn test_intra_block_double_spend_names_the_input() {
        let ledger = easy_ledger();
        let a = value_tx(TransactionKind::Transfer, vec![input("t0", 3, 10)], vec![]);
        let b = value_tx(TransactionKind::Transfer, vec![input("t0", 3, 10)], vec![]);
        let block = sealed_block(&ledger.last_block(), vec![a, b]);

        match ledger.add_block(block, false).unwrap_err() {
            LedgerError::DoubleSpend { keys } => assert_eq!(keys, vec!["t0|3".to_string()]),
            other => panic!("expected DoubleSpend, got {other:?}"),
        }
    }

    #[test]
    fn test_second_reward_transaction_rejected() {
        let ledger = easy_ledger();
        let a = value_tx(TransactionKind::Reward, vec![], vec![output(50, "m")]);
        let b = value_tx(TransactionKind::Reward, vec![], vec![output(50, "m")]);
        // Two rewards also overdraw the subsidy, so fund them explicitly.
        let funding = value_tx(TransactionKind::Transfer, vec![input("t0", 0, 100)], vec![]);
        let block = sealed_block(&ledger.last_block(), vec![a, b, funding]);

        match ledger.add_block(block, false).unwrap_err() {
            LedgerError::TooManyOfKind { kind, count } => {
                assert_eq!(kind, "reward");
                assert_eq!(count, 2);
            }
            other => panic!("expected TooManyOfKind, got {other:?}"),
        }
    }

    #[test]
    fn test_committed_transaction_cannot_be_resubmitted() {
        let ledger = easy_ledger();
        let tx = value_tx(
            TransactionKind::Transfer,
            vec![input("t0", 0, 50)],
            vec![output(50, "bob")],
        );
        let block = sealed_block(&ledger.last_block(), vec![tx.clone()]);
        ledger.add_block(block, false).unwrap();

        let err = ledger.add_transaction(tx, false).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTransaction { .. }));
    }

    #[test]
    fn test_spent_input_rejected_across_blocks() {
        let ledger = easy_ledger();
        let first = value_tx(
            TransactionKind::Transfer,
            vec![input("t0", 0, 50)],
            vec![output(50, "bob")],
        );
        let block = sealed_block(&ledger.last_block(), vec![first]);
        ledger.add_block(block, false).unwrap();

        let respend = value_tx(
            TransactionKind::Transfer,
            vec![input("t0", 0, 50)],
            vec![output(50, "carol")],
        );
        match ledger.add_transaction(respend, false).unwrap_err() {
            LedgerError::SpentInput { keys, .. } => assert_eq!(keys, vec!["t0|0".to_string()]),
            other => panic!("expected SpentInput, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_without_public_key_never_reaches_the_pool() {
        let ledger = easy_ledger();
        let tx = Transaction {
            id: random_id(),
            kind: TransactionKind::StudentRegistration,
            data: TransactionData::Registration(RegistrationPayload {
                student_id: "s-1".into(),
                public_key: String::new(),
            }),
            hash: None,
            signature: None,
        };

        let err = ledger.add_transaction(tx, true).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedTransaction { .. }));
        assert!(ledger.pending_transactions().is_empty());
    }

    #[test]
    fn test_tampered_block_hash_rejected() {
        let ledger = easy_ledger();
        let mut block = sealed_block(&ledger.last_block(), vec![]);
        block.timestamp += 1; // hash no longer covers the content

        let err = ledger.add_block(block, false).unwrap_err();
        assert!(matches!(err, LedgerError::HashMismatch { .. }));
    }

    #[test]
    fn test_unsolved_block_rejected_at_real_difficulty() {
        let config = LedgerConfig {
            block_reward: 50,
            difficulty: DifficultyConfig {
                base_difficulty: 1,
                ..Default::default()
            },
        };
        let ledger = Arc::new(Ledger::open(Arc::new(InMemoryStore::new()), config).unwrap());

        let block = sealed_block(&ledger.last_block(), vec![]);
        let err = ledger.add_block(block, false).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ProofOfWorkExceedsTarget { required: 1, .. }
        ));
    }
}
