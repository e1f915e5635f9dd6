//! Secret storage for student keypairs.
//!
//! Keys are derived deterministically from a secret, so only the secret
//! needs to survive. The store is a port so deployments can swap in an
//! encrypted backend without touching the registrar.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Holds the per-student secrets that keypairs are derived from.
pub trait SecretStore: Send + Sync {
    fn put(&self, student_id: &str, secret: String);
    fn get(&self, student_id: &str) -> Option<String>;
}

/// Volatile secret store; contents are lost on drop.
#[derive(Default)]
pub struct InMemoryWallet {
    secrets: Mutex<HashMap<String, String>>,
}

impl InMemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for InMemoryWallet {
    fn put(&self, student_id: &str, secret: String) {
        self.secrets.lock().insert(student_id.to_owned(), secret);
    }

    fn get(&self, student_id: &str) -> Option<String> {
        self.secrets.lock().get(student_id).cloned()
    }
}
