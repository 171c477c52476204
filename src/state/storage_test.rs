use super::*;

#[test]
fn memory_storage_round_trip() {
    let storage = MemoryStorage::default();
    assert_eq!(storage.load(), None);
    storage.save("t1").unwrap();
    assert_eq!(storage.load().as_deref(), Some("t1"));
    storage.remove();
    assert_eq!(storage.load(), None);
}

#[test]
fn memory_storage_clones_share_slot() {
    let storage = MemoryStorage::with_token("t1");
    let view = storage.clone();
    storage.remove();
    assert_eq!(view.peek(), None);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_storage_is_inert_outside_hydrate() {
    let storage = BrowserStorage::new("authToken");
    assert_eq!(storage.key(), "authToken");
    assert_eq!(storage.load(), None);
    assert_eq!(storage.save("t1"), Err(StorageError::Unavailable));
    storage.remove();
}
