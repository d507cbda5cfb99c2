//! Session identity persisted on disk, as the CLI uses it.

#![allow(clippy::unwrap_used)]

use lynora_integration_tests::fixtures::sample_catalog;
use lynora_storefront::cart::CartStore;
use lynora_storefront::session::{FileStorage, KeyValueStore, SESSION_KEY, get_or_create_session_id};
use lynora_storefront::store::MemoryStore;

#[test]
fn test_session_file_is_created_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".lynora").join("session.json");
    let storage = FileStorage::new(&path);

    assert!(!path.exists());
    let id = get_or_create_session_id(&storage);

    assert!(path.exists());
    assert_eq!(storage.get(SESSION_KEY).unwrap().as_deref(), Some(id.as_str()));
}

#[test]
fn test_other_keys_are_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.set("theme", "dark").unwrap();

    get_or_create_session_id(&storage);

    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    assert!(storage.has(SESSION_KEY).unwrap());
}

#[tokio::test]
async fn test_cart_follows_the_persisted_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let catalog = sample_catalog();
    let store = MemoryStore::with_catalog(catalog.products.clone(), catalog.categories());

    // First invocation adds to the cart
    {
        let session = get_or_create_session_id(&FileStorage::new(&path));
        let mut cart = CartStore::new(store.clone(), session);
        cart.quick_add(catalog.product("garden-party-midi"))
            .await
            .unwrap();
    }

    // A later invocation reads the same session back from disk
    let session = get_or_create_session_id(&FileStorage::new(&path));
    let mut cart = CartStore::new(store, session);
    cart.load().await.unwrap();
    assert_eq!(cart.cart_count(), 1);
}
