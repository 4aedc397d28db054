//! Shared fixtures for service integration tests
#![allow(dead_code)]

use std::sync::Arc;

use common::prelude::*;
use common::testkit::MemoryRepository;
use uuid::Uuid;

pub const LOGIN: &str = "login345";
pub const PASSWORD: &str = "Passw_345";

/// A fresh in-memory store and a service reading through default caches
pub fn setup() -> (Arc<MemoryRepository>, DocumentService<MemoryRepository>) {
    setup_with(CacheConfig::default())
}

pub fn setup_with(config: CacheConfig) -> (Arc<MemoryRepository>, DocumentService<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let service = DocumentService::new(repo.clone(), &config);
    (repo, service)
}

/// Seed a user with an open session, returning its id and token
pub fn seed_session(repo: &MemoryRepository, login: &str) -> (Uuid, String) {
    let id = repo.insert_user(login, PASSWORD);
    let token = common::token::generate_token();
    repo.insert_session(id, &token);
    (id, token)
}

pub fn upload(name: &str, token: &str, grant: &[&str], public: bool) -> Upload {
    Upload {
        name: name.to_string(),
        token: token.to_string(),
        mime: "text/plain".to_string(),
        content: format!("contents of {}", name).into_bytes(),
        grant: grant.iter().map(|g| g.to_string()).collect(),
        public,
    }
}
