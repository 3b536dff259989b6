use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

fn temp_path(tag: &str) -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let n = SEQ.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("pokedex-store-{tag}-{}-{n}.json", std::process::id()))
}

#[test]
fn memory_store_get_set_remove() {
    let mut store = MemoryStore::new();
    assert_eq!(store.get("form-step-1").unwrap(), None);

    store.set("form-step-1", "{}").unwrap();
    store.set("form-step-1", r#"{"firstName":"Ash"}"#).unwrap();
    assert_eq!(store.get("form-step-1").unwrap().as_deref(), Some(r#"{"firstName":"Ash"}"#));
    assert_eq!(store.len(), 1);

    store.remove("form-step-1").unwrap();
    store.remove("form-step-1").unwrap();
    assert!(store.is_empty());
}

#[test]
fn file_store_starts_empty_when_missing() {
    let path = temp_path("missing");
    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("anything").unwrap(), None);
    assert!(!path.exists());
}

#[test]
fn file_store_survives_reopen() {
    let path = temp_path("reopen");
    {
        let mut store = FileStore::open(&path).unwrap();
        store.set("form-step-2", r#"{"email":"a@b.cd"}"#).unwrap();
        store.set("form-step-3", "{}").unwrap();
        store.remove("form-step-3").unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("form-step-2").unwrap().as_deref(), Some(r#"{"email":"a@b.cd"}"#));
    assert_eq!(store.get("form-step-3").unwrap(), None);
    assert_eq!(store.path(), path.as_path());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_store_rejects_corrupt_file() {
    let path = temp_path("corrupt");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Serialize(_)));
    assert_eq!(err.error_code(), "E_STORE_SERIALIZE");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_store_treats_blank_file_as_empty() {
    let path = temp_path("blank");
    std::fs::write(&path, "  \n").unwrap();
    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("form-step-1").unwrap(), None);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn failed_set_leaves_previous_value() {
    let path = temp_path("no-dir").with_extension("d").join("store.json");
    let mut store = FileStore::open(&path).unwrap();

    let err = store.set("form-step-1", r#"{"firstName":"Ash","lastName":"Ketchum"}"#).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert_eq!(store.get("form-step-1").unwrap(), None);
}

#[test]
fn failed_remove_keeps_the_key() {
    let dir = temp_path("vanishing").with_extension("d");
    std::fs::create_dir_all(&dir).unwrap();
    let mut store = FileStore::open(dir.join("store.json")).unwrap();
    store.set("form-step-2", r#"{"email":"a@b.cd"}"#).unwrap();

    std::fs::remove_dir_all(&dir).unwrap();
    assert!(store.remove("form-step-2").is_err());
    assert_eq!(store.get("form-step-2").unwrap().as_deref(), Some(r#"{"email":"a@b.cd"}"#));
}
