use zenden_core::{
    FileStore, Garden, GardenItem, GardenLibrary, ImportOutcome, ItemKind, KeyValueStore,
    LibraryError, MemoryStore, Position, GARDEN_TO_LOAD_KEY, SAVED_GARDENS_KEY,
};

fn garden(name: &str) -> Garden {
    let mut garden = Garden::new(name);
    garden.items.push(GardenItem::new(
        ItemKind::Plant,
        "Bonsai",
        "/items/bonsai.png",
        Position::new(40.0, 60.0),
    ));
    garden
}

#[test]
fn save_lists_newest_first_and_replaces_by_id() {
    let mut library = GardenLibrary::new(MemoryStore::new());
    let first = library.save(garden("first")).unwrap();
    let second = library.save(garden("second")).unwrap();

    let names: Vec<String> = library.list().unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["second", "first"]);

    let mut edited = first.clone();
    edited.name = "first, edited".to_string();
    library.save(edited).unwrap();

    let listed = library.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[0].name, "first, edited");
    assert_eq!(listed[1].id, second.id);
}

#[test]
fn save_rejects_invalid_garden() {
    let mut library = GardenLibrary::new(MemoryStore::new());
    let mut bad = garden("bad");
    bad.items[0].scale = -1.0;

    let err = library.save(bad).unwrap_err();
    assert!(matches!(err, LibraryError::Validation(_)));
    assert!(library.list().unwrap().is_empty());
}

#[test]
fn delete_and_rename() {
    let mut library = GardenLibrary::new(MemoryStore::new());
    let saved = library.save(garden("old name")).unwrap();

    library.rename(&saved.id, "new name").unwrap();
    assert_eq!(library.get(&saved.id).unwrap().unwrap().name, "new name");

    assert!(library.delete(&saved.id).unwrap());
    assert!(!library.delete(&saved.id).unwrap());
    assert!(matches!(
        library.rename(&saved.id, "x").unwrap_err(),
        LibraryError::NotFound(_)
    ));
}

#[test]
fn staged_garden_is_consumed_once() {
    let mut library = GardenLibrary::new(MemoryStore::new());
    let staged = garden("to open");

    library.stage_for_load(&staged).unwrap();
    assert_eq!(library.take_staged().unwrap(), Some(staged));
    assert_eq!(library.take_staged().unwrap(), None);
}

#[test]
fn corrupt_staged_value_is_dropped() {
    let mut store = MemoryStore::new();
    store.set(GARDEN_TO_LOAD_KEY, "{oops").unwrap();
    let mut library = GardenLibrary::new(store);

    assert_eq!(library.take_staged().unwrap(), None);
    let store = library.into_store();
    assert_eq!(store.get(GARDEN_TO_LOAD_KEY).unwrap(), None);
}

#[test]
fn corrupt_saved_list_is_reported() {
    let mut store = MemoryStore::new();
    store.set(SAVED_GARDENS_KEY, "[{\"name\": 1}]").unwrap();
    let library = GardenLibrary::new(store);

    let err = library.list().unwrap_err();
    assert!(matches!(err, LibraryError::Corrupt { key, .. } if key == SAVED_GARDENS_KEY));
}

#[test]
fn import_shared_adds_skips_identical_and_copies_on_conflict() {
    let mut library = GardenLibrary::new(MemoryStore::new());
    let shared = garden("shared");

    let added = library.import_shared(shared.clone()).unwrap();
    assert_eq!(added, ImportOutcome::Added(shared.id.clone()));

    let again = library.import_shared(shared.clone()).unwrap();
    assert_eq!(again, ImportOutcome::Unchanged(shared.id.clone()));
    assert_eq!(library.list().unwrap().len(), 1);

    let mut remote_edit = shared.clone();
    remote_edit.name = "shared, changed elsewhere".to_string();
    let copied = library.import_shared(remote_edit).unwrap();
    match &copied {
        ImportOutcome::Copied { original_id, id } => {
            assert_eq!(original_id, &shared.id);
            assert_ne!(id, &shared.id);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let listed = library.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, copied.id());
    assert_eq!(library.get(&shared.id).unwrap().unwrap().name, "shared");
}

#[test]
fn file_store_persists_library_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("local_storage.json");

    let saved = {
        let mut library = GardenLibrary::new(FileStore::open(&path).unwrap());
        let saved = library.save(garden("durable")).unwrap();
        library.stage_for_load(&saved).unwrap();
        saved
    };

    let mut reopened = GardenLibrary::new(FileStore::open(&path).unwrap());
    assert_eq!(reopened.list().unwrap(), vec![saved.clone()]);
    assert_eq!(reopened.take_staged().unwrap(), Some(saved));

    let after_take = FileStore::open(&path).unwrap();
    assert_eq!(after_take.get(GARDEN_TO_LOAD_KEY).unwrap(), None);
}

#[test]
fn file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(FileStore::open(&path).is_err());
}
