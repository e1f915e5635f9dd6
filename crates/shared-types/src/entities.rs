//! Chain and transaction entities.
//!
//! Hash preimages follow the persisted JSON byte-for-byte:
//!
//! - block: `index + previousHash + timestamp + JSON(transactions) + nonce`
//! - transaction: `id + type + JSON(data)`
//!
//! `difficulty` and `miner` are deliberately outside the block preimage; the
//! ledger stamps the difficulty at admission time without invalidating the
//! solved hash.

use serde::{Deserialize, Serialize};
use shared_crypto::{hash_value, sha256_hex};

/// Hex-encoded Ed25519 public key used as an account identity.
pub type Address = String;

/// Hex-encoded SHA-256 block digest.
pub type BlockHash = String;

/// Sentinel `previousHash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Fixed genesis timestamp (epoch seconds).
const GENESIS_TIMESTAMP: u64 = 1_465_154_705;

/// Leading hex characters of a block hash measured for proof of work.
const POW_MEASURE_HEX_CHARS: usize = 14;

/// A block in the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Height in the chain; genesis is 0.
    pub index: u64,

    /// Hash of the prior block, `"0"` for genesis.
    pub previous_hash: BlockHash,

    /// Epoch seconds when the block was assembled. 0 means "not yet set";
    /// the ledger fills it at admission.
    #[serde(default)]
    pub timestamp: u64,

    /// Nonce found by the proof-of-work solver.
    pub nonce: u64,

    /// Difficulty target in effect when mined. Stamped by the ledger at
    /// admission; absent until then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u64>,

    /// Ordered transactions committed by this block.
    pub transactions: Vec<Transaction>,

    /// Identity credited for the block, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner: Option<Address>,

    /// Self-referential digest over the other fields (see module docs).
    pub hash: BlockHash,
}

impl Block {
    /// The fixed genesis block. Every ledger starts from this exact content.
    pub fn genesis() -> Self {
        let mut genesis = Self {
            index: 0,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            timestamp: GENESIS_TIMESTAMP,
            nonce: 0,
            difficulty: None,
            transactions: Vec::new(),
            miner: None,
            hash: String::new(),
        };
        genesis.hash = genesis.compute_hash();
        genesis
    }

    /// Recompute the digest from the block's own content.
    pub fn compute_hash(&self) -> BlockHash {
        let transactions_json = serde_json::to_string(&self.transactions)
            .expect("transaction serialization is infallible");
        let preimage = format!(
            "{}{}{}{}{}",
            self.index, self.previous_hash, self.timestamp, transactions_json, self.nonce
        );
        sha256_hex(preimage.as_bytes())
    }

    /// Proof-of-work measure of this block's hash: the leading 14 hex chars
    /// parsed as an integer. Lower is harder; a block passes when the measure
    /// does not exceed the required target.
    pub fn measured_difficulty(&self) -> u64 {
        self.hash
            .get(..POW_MEASURE_HEX_CHARS)
            .and_then(|prefix| u64::from_str_radix(prefix, 16).ok())
            .unwrap_or(u64::MAX)
    }
}

/// Transaction kind tag. Serialized in kebab-case to match the stored form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// Value moved between addresses.
    Transfer,
    /// Fee collected by the block producer.
    Fee,
    /// Minting reward.
    Reward,
    /// Student identity registration.
    StudentRegistration,
    /// Signed attendance certification.
    Attendance,
}

impl TransactionKind {
    /// Wire tag for this kind, as embedded in transaction hash preimages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Fee => "fee",
            Self::Reward => "reward",
            Self::StudentRegistration => "student-registration",
            Self::Attendance => "attendance",
        }
    }

    /// True for kinds that carry spendable inputs/outputs.
    pub fn carries_value(&self) -> bool {
        matches!(self, Self::Transfer | Self::Fee | Self::Reward)
    }
}

/// Reference to a prior output being spent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxInput {
    /// Id of the transaction whose output is consumed.
    pub transaction: String,

    /// Output position within that transaction.
    pub index: u64,

    /// Amount carried by the referenced output.
    pub amount: u64,

    /// Address the referenced output was paid to.
    pub address: Address,

    /// Owner's signature authorizing the spend, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// A newly created output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Non-negative amount.
    pub amount: u64,

    /// Receiving address.
    pub address: Address,
}

/// Payload of a `student-registration` transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    /// Registering student's identifier.
    pub student_id: String,

    /// Hex-encoded Ed25519 public key the student will sign with.
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// Payload of an `attendance` transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendancePayload {
    /// Attending student's identifier.
    pub student_id: String,

    /// Event being attended.
    pub event_id: String,

    /// Epoch seconds when attendance was recorded. Part of the signed
    /// certificate, so tampering invalidates the signature.
    pub timestamp: u64,

    /// Hex signature over the certificate digest.
    pub signature: String,

    /// Public key the signature verifies against.
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// Per-kind transaction payload.
///
/// Untagged: the stored JSON carries the kind tag on the transaction itself,
/// and each payload shape is disjoint. `Attendance` is tried before
/// `Registration` because a registration object is a strict subset of an
/// attendance object's fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionData {
    /// UTXO payload for transfer/fee/reward kinds.
    Value {
        /// Outputs being consumed.
        inputs: Vec<TxInput>,
        /// Outputs being created.
        outputs: Vec<TxOutput>,
    },
    /// Attendance certification payload.
    Attendance(AttendancePayload),
    /// Student registration payload.
    Registration(RegistrationPayload),
}

impl TransactionData {
    /// Inputs of a value-carrying payload, if any.
    pub fn inputs(&self) -> Option<&[TxInput]> {
        match self {
            Self::Value { inputs, .. } => Some(inputs),
            _ => None,
        }
    }

    /// Outputs of a value-carrying payload, if any.
    pub fn outputs(&self) -> Option<&[TxOutput]> {
        match self {
            Self::Value { outputs, .. } => Some(outputs),
            _ => None,
        }
    }
}

/// A ledger transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier (random 256-bit hex).
    pub id: String,

    /// Kind tag; selects the validation path.
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Kind-specific payload.
    pub data: TransactionData,

    /// Digest over `id + type + JSON(data)`, when computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Detached signature, when the kind requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Transaction {
    /// Recompute the digest from the transaction's own content.
    pub fn compute_hash(&self) -> String {
        let data_json =
            serde_json::to_string(&self.data).expect("payload serialization is infallible");
        let preimage = format!("{}{}{}", self.id, self.kind.as_str(), data_json);
        sha256_hex(preimage.as_bytes())
    }
}

/// The certificate a student signs when recording attendance.
///
/// The digest over this exact shape is what `AttendancePayload::signature`
/// must verify against.
#[derive(Clone, Debug, Serialize)]
pub struct AttendanceCertificate<'a> {
    /// Student identifier.
    pub student_id: &'a str,
    /// Event identifier.
    pub event_id: &'a str,
    /// Epoch seconds of the attendance.
    pub timestamp: u64,
}

impl AttendanceCertificate<'_> {
    /// Canonical certificate digest: SHA-256 over the certificate's JSON.
    pub fn digest(&self) -> String {
        hash_value(self).expect("certificate serialization is infallible")
    }
}

/// An output with no matching input anywhere in committed or pending history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Transaction that created the output.
    pub transaction: String,

    /// Output position within that transaction.
    pub index: u64,

    /// Amount available.
    pub amount: u64,

    /// Owning address.
    pub address: Address,
}
