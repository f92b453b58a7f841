use super::*;

#[test]
fn memory_storage_get_set_remove() {
    let storage = MemoryStorage::new();
    assert!(storage.is_empty());
    storage.set("token", "abc");
    assert_eq!(storage.get("token").as_deref(), Some("abc"));
    storage.set("token", "def");
    assert_eq!(storage.get("token").as_deref(), Some("def"));
    assert_eq!(storage.len(), 1);
    storage.remove("token");
    assert_eq!(storage.get("token"), None);
    storage.remove("missing");
    assert!(storage.is_empty());
}

#[test]
fn file_storage_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
    assert_eq!(storage.get("token"), None);
    assert!(!storage.path().exists());
}

#[test]
fn file_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set("token", "abc");
    storage.set("refreshToken", "r-1");
    storage.remove("refreshToken");

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("token").as_deref(), Some("abc"));
    assert_eq!(reopened.get("refreshToken"), None);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn file_storage_rejects_non_object_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let err = FileStorage::open(&path).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}

#[test]
fn file_storage_treats_blank_file_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "  \n").unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(storage.get("user"), None);
}
