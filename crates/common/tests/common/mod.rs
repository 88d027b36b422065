//! Shared test utilities for store integration tests
#![allow(dead_code)]

use common::accounts::CredentialStore;
use common::documents::DocumentStore;
use tempfile::TempDir;

/// Set up an empty document store and credential store in a fresh temp dir
pub fn setup_test_env() -> (DocumentStore, CredentialStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let documents = DocumentStore::open(temp_dir.path().join("data")).unwrap();
    let credentials = CredentialStore::new(temp_dir.path().join("users.json"));
    (documents, credentials, temp_dir)
}

/// Write files straight into the store directory, bypassing naming rules
pub fn seed_raw(store: &DocumentStore, files: &[(&str, &str)]) {
    for (name, content) in files {
        std::fs::write(store.root().join(name), content).unwrap();
    }
}

/// Every entry in the store directory, including non-documents
pub fn raw_entries(store: &DocumentStore) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
