//! Consensus validation rules.
//!
//! Stateless functions over a reference chain. Every transaction — regardless
//! of kind — enters through [`check_transaction`]: the committed-id
//! uniqueness rule applies to all kinds, then dispatch goes to the
//! kind-specific rule set. Registration and attendance transactions carry no
//! spendable value and are checked structurally; transfer/fee/reward
//! transactions go through the UTXO rules (unspent inputs, hash self-check).

use std::collections::HashMap;

use shared_types::{Block, Transaction, TransactionData, TransactionKind};

use super::difficulty::DifficultyAdjuster;
use super::error::{LedgerError, LedgerResult};

fn input_key(transaction: &str, index: u64) -> String {
    format!("{transaction}|{index}")
}

/// Validate a candidate block against its predecessor and a reference chain.
///
/// Checks, in order: index sequence, previous-hash linkage, hash integrity,
/// proof of work, every contained transaction, block balance, intra-block
/// double spends, and fee/reward cardinality. Fails fast on the first
/// violation.
pub fn check_block(
    new_block: &Block,
    previous_block: &Block,
    reference_chain: &[Block],
    required_difficulty: u64,
    block_reward: u64,
) -> LedgerResult<()> {
    if previous_block.index + 1 != new_block.index {
        return Err(LedgerError::InvalidIndex {
            expected: previous_block.index + 1,
            actual: new_block.index,
        });
    }

    if previous_block.hash != new_block.previous_hash {
        return Err(LedgerError::PreviousHashMismatch {
            expected: previous_block.hash.clone(),
            actual: new_block.previous_hash.clone(),
        });
    }

    let recomputed = new_block.compute_hash();
    if recomputed != new_block.hash {
        return Err(LedgerError::HashMismatch {
            expected: recomputed,
            actual: new_block.hash.clone(),
        });
    }

    let measured = new_block.measured_difficulty();
    if measured > required_difficulty {
        return Err(LedgerError::ProofOfWorkExceedsTarget {
            measured,
            required: required_difficulty,
        });
    }

    for tx in &new_block.transactions {
        check_transaction(tx, reference_chain)?;
    }

    check_balance(new_block, block_reward)?;
    check_intra_block_spends(new_block)?;
    check_kind_cardinality(new_block)?;

    Ok(())
}

/// Validate a single transaction against a reference chain, dispatched by
/// kind.
///
/// A transaction id never appears in more than one committed block, whatever
/// the kind, so the committed-id scan runs before any kind-specific rule.
pub fn check_transaction(tx: &Transaction, reference_chain: &[Block]) -> LedgerResult<()> {
    let already_committed = reference_chain
        .iter()
        .any(|block| block.transactions.iter().any(|t| t.id == tx.id));
    if already_committed {
        return Err(LedgerError::DuplicateTransaction { id: tx.id.clone() });
    }

    match tx.kind {
        TransactionKind::StudentRegistration => check_registration(tx),
        TransactionKind::Attendance => check_attendance(tx),
        TransactionKind::Transfer | TransactionKind::Fee | TransactionKind::Reward => {
            check_value_transaction(tx, reference_chain)
        }
    }
}

/// Validate a full candidate chain: genesis equality, then every block
/// against its predecessor with the candidate prefix as reference.
pub fn check_chain(
    chain: &[Block],
    adjuster: &DifficultyAdjuster,
    block_reward: u64,
) -> LedgerResult<()> {
    if chain.first() != Some(&Block::genesis()) {
        return Err(LedgerError::GenesisMismatch);
    }

    for i in 1..chain.len() {
        let prefix = &chain[..i];
        let required = adjuster.required_difficulty(chain[i].index, prefix);
        check_block(&chain[i], &chain[i - 1], prefix, required, block_reward).map_err(
            |source| LedgerError::InvalidSequence {
                index: chain[i].index,
                source: Box::new(source),
            },
        )?;
    }

    Ok(())
}

fn check_registration(tx: &Transaction) -> LedgerResult<()> {
    let TransactionData::Registration(payload) = &tx.data else {
        return Err(LedgerError::MalformedTransaction {
            id: tx.id.clone(),
            reason: "missing registration fields",
        });
    };

    if payload.student_id.is_empty() || payload.public_key.is_empty() {
        return Err(LedgerError::MalformedTransaction {
            id: tx.id.clone(),
            reason: "registration requires student_id and publicKey",
        });
    }

    Ok(())
}

fn check_attendance(tx: &Transaction) -> LedgerResult<()> {
    let TransactionData::Attendance(payload) = &tx.data else {
        return Err(LedgerError::MalformedTransaction {
            id: tx.id.clone(),
            reason: "missing attendance fields",
        });
    };

    if payload.student_id.is_empty()
        || payload.event_id.is_empty()
        || payload.signature.is_empty()
        || payload.timestamp == 0
    {
        return Err(LedgerError::MalformedTransaction {
            id: tx.id.clone(),
            reason: "attendance requires student_id, event_id, timestamp and signature",
        });
    }

    Ok(())
}

fn check_value_transaction(tx: &Transaction, reference_chain: &[Block]) -> LedgerResult<()> {
    let TransactionData::Value { inputs, .. } = &tx.data else {
        return Err(LedgerError::MalformedTransaction {
            id: tx.id.clone(),
            reason: "missing inputs or outputs",
        });
    };

    // Self-check: a stored hash must match the content it claims to digest.
    if let Some(stored) = &tx.hash {
        if *stored != tx.compute_hash() {
            return Err(LedgerError::MalformedTransaction {
                id: tx.id.clone(),
                reason: "stored hash does not match content",
            });
        }
    }

    let mut spent = Vec::new();
    for input in inputs {
        let consumed = reference_chain.iter().any(|block| {
            block.transactions.iter().any(|t| {
                t.data.inputs().is_some_and(|ins| {
                    ins.iter()
                        .any(|i| i.transaction == input.transaction && i.index == input.index)
                })
            })
        });
        if consumed {
            spent.push(input_key(&input.transaction, input.index));
        }
    }
    if !spent.is_empty() {
        return Err(LedgerError::SpentInput {
            id: tx.id.clone(),
            keys: spent,
        });
    }

    Ok(())
}

/// Reward-adjusted inputs must cover outputs across the whole block.
fn check_balance(block: &Block, block_reward: u64) -> LedgerResult<()> {
    let mut inputs_sum = block_reward;
    let mut outputs_sum = 0u64;

    for tx in &block.transactions {
        if let Some(inputs) = tx.data.inputs() {
            inputs_sum = inputs_sum.saturating_add(inputs.iter().map(|i| i.amount).sum());
        }
        if let Some(outputs) = tx.data.outputs() {
            outputs_sum = outputs_sum.saturating_add(outputs.iter().map(|o| o.amount).sum());
        }
    }

    if inputs_sum < outputs_sum {
        return Err(LedgerError::InsufficientBalance {
            inputs: inputs_sum,
            outputs: outputs_sum,
        });
    }

    Ok(())
}

/// No `(transaction, index)` input pair may repeat within one block.
fn check_intra_block_spends(block: &Block) -> LedgerResult<()> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for tx in &block.transactions {
        if let Some(inputs) = tx.data.inputs() {
            for input in inputs {
                *seen.entry(input_key(&input.transaction, input.index)).or_insert(0) += 1;
            }
        }
    }

    let mut keys: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(key, _)| key)
        .collect();

    if keys.is_empty() {
        Ok(())
    } else {
        keys.sort();
        Err(LedgerError::DoubleSpend { keys })
    }
}

/// At most one fee and one reward transaction per block.
fn check_kind_cardinality(block: &Block) -> LedgerResult<()> {
    for kind in [TransactionKind::Fee, TransactionKind::Reward] {
        let count = block.transactions.iter().filter(|t| t.kind == kind).count();
        if count > 1 {
            return Err(LedgerError::TooManyOfKind {
                kind: kind.as_str(),
                count,
            });
        }
    }
    Ok(())
}
