//! Common test utilities for kanban-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::FailingRepository;

use std::path::PathBuf;
use std::sync::Arc;

use kanban_auth_core::{AuthConfig, AuthService, HasherConfig, KeyPair, TokenIssuer, TokenVerifier};
use kanban_db::MemoryCredentialRepository;

/// Cheap Argon2 parameters so tests don't spend seconds hashing
pub const FAST_HASHER: HasherConfig = HasherConfig {
    memory_cost_kib: 1024,
    time_cost: 1,
    parallelism: 1,
};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn test_config() -> AuthConfig {
    AuthConfig::new(fixture("private.pem"), fixture("public.pem")).with_hasher(FAST_HASHER)
}

pub fn test_keys() -> Arc<KeyPair> {
    Arc::new(KeyPair::load(fixture("private.pem"), fixture("public.pem")).expect("fixture keys load"))
}

#[allow(dead_code)]
pub fn issuer_and_verifier() -> (TokenIssuer, TokenVerifier) {
    let keys = test_keys();
    let config = test_config();
    (
        TokenIssuer::new(Arc::clone(&keys), &config),
        TokenVerifier::new(keys, &config),
    )
}

#[allow(dead_code)]
pub fn memory_service() -> (AuthService<MemoryCredentialRepository>, MemoryCredentialRepository) {
    let repo = MemoryCredentialRepository::new();
    let service = AuthService::new(test_config(), Arc::new(repo.clone())).expect("service builds");
    (service, repo)
}
