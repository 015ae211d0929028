use std::collections::HashSet;
use zenden_core::db::open_db_in_memory;
use zenden_core::{
    AmbientSound, AtmosphereSettings, ErrorKind, Garden, GardenItem, ItemKind, Position,
    RepoError, ShareError, ShareLink, ShareRepository, ShareService, SqliteShareRepository,
    TimeOfDay,
};

fn sample_garden() -> Garden {
    let mut garden = Garden::new("Morning pond");
    let mut rock = GardenItem::new(
        ItemKind::Rock,
        "Mossy stone",
        "/items/rock-moss.png",
        Position::new(120.5, 80.25),
    );
    rock.rotation = 45.0;
    rock.scale = 1.5;
    rock.z_index = Some(2);
    let pond = GardenItem::new(
        ItemKind::Water,
        "Koi pond",
        "/items/pond.png",
        Position::new(300.0, 240.0),
    );
    garden.items = vec![rock, pond];
    garden.settings = Some(AtmosphereSettings {
        time_of_day: TimeOfDay::Dusk,
        ambient_sound: Some(AmbientSound::Stream),
        volume: 0.3,
        sound_enabled: true,
    });
    garden
}

fn service(conn: &rusqlite::Connection) -> ShareService<SqliteShareRepository<'_>> {
    ShareService::new(
        SqliteShareRepository::new(conn),
        ShareLink::new("https://zen.example"),
    )
}

#[test]
fn store_then_fetch_returns_equal_garden() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let garden = sample_garden();

    let receipt = service.share(garden.clone()).unwrap();
    assert_eq!(receipt.garden, garden);
    assert_eq!(receipt.share_url, format!("https://zen.example/share/{}", receipt.id));

    let loaded = service.fetch(&receipt.id).unwrap();
    assert_eq!(loaded, garden);
}

#[test]
fn share_json_fills_missing_garden_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let body = r#"{
        "garden": {
            "name": "Bare",
            "items": [
                {"id": "a", "type": "plant", "name": "Bamboo", "image": "/b.png",
                 "position": {"x": 10, "y": 20}}
            ]
        }
    }"#;
    let receipt = service.share_json(body).unwrap();
    assert!(!receipt.garden.id.is_empty());
    assert!(receipt.garden.created_at > 0);
    assert_eq!(receipt.garden.items[0].scale, 1.0);

    let loaded = service.fetch(&receipt.id).unwrap();
    assert_eq!(loaded, receipt.garden);
}

#[test]
fn share_json_generates_id_for_null_garden_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let body = r#"{"garden": {"id": null, "name": "n", "createdAt": 0, "items": []}}"#;
    let receipt = service.share_json(body).unwrap();
    assert!(!receipt.garden.id.is_empty());
    assert!(receipt.garden.created_at > 0);
    assert_eq!(service.fetch(&receipt.id).unwrap(), receipt.garden);
}

#[test]
fn share_json_rejects_missing_or_non_array_items() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for body in [
        r#"{"garden": {"name": "no items"}}"#,
        r#"{"garden": {"name": "object items", "items": {"a": 1}}}"#,
        r#"{"garden": {"name": "null items", "items": null}}"#,
        r#"{"garden": []}"#,
        r#"{}"#,
        "not json",
    ] {
        let err = service.share_json(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "body {body} gave {err}");
    }

    let repo = SqliteShareRepository::new(&conn);
    assert_eq!(repo.count_shares().unwrap(), 0);
}

#[test]
fn share_json_rejects_invalid_items() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let bad_kind = r#"{"garden": {"items": [
        {"id": "a", "type": "volcano", "position": {"x": 0, "y": 0}}
    ]}}"#;
    let err = service.share_json(bad_kind).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let duplicate_ids = r#"{"garden": {"items": [
        {"id": "a", "type": "rock", "position": {"x": 0, "y": 0}},
        {"id": "a", "type": "rock", "position": {"x": 5, "y": 5}}
    ]}}"#;
    let err = service.share_json(duplicate_ids).unwrap_err();
    assert!(err.to_string().contains("duplicate item id"), "{err}");
}

#[test]
fn fetch_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.fetch("doesNotExist").unwrap_err();
    assert!(matches!(err, ShareError::NotFound(ref id) if id == "doesNotExist"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn fetch_malformed_id_is_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for id in ["", "../../etc/passwd", "has space"] {
        let err = service.fetch(id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "id `{id}`");
    }
}

#[test]
fn fetch_matches_ids_exactly() {
    let conn = open_db_in_memory().unwrap();
    let receipt = service(&conn).share(sample_garden()).unwrap();

    for id in [format!(" {}", receipt.id), format!("{}\n", receipt.id)] {
        let err = service(&conn).fetch(&id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "id `{id}`");
    }
    assert!(service(&conn).fetch(&receipt.id).is_ok());
}

#[test]
fn fetch_corrupt_blob_is_internal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteShareRepository::new(&conn);
    repo.put_share("broken1", "{\"name\": 3}").unwrap();

    let err = service(&conn).fetch("broken1").unwrap_err();
    assert!(matches!(err, ShareError::Corrupt { .. }));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn repeated_shares_get_unique_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let garden = sample_garden();

    let ids: HashSet<String> = (0..50)
        .map(|_| service.share(garden.clone()).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn insert_share_does_not_overwrite_and_put_share_does() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteShareRepository::new(&conn);

    repo.insert_share("key1", "first").unwrap();
    let err = repo.insert_share("key1", "second").unwrap_err();
    assert!(matches!(err, RepoError::Conflict(ref id) if id == "key1"));
    assert_eq!(repo.get_share("key1").unwrap().as_deref(), Some("first"));

    repo.put_share("key1", "third").unwrap();
    assert_eq!(repo.get_share("key1").unwrap().as_deref(), Some("third"));
    assert_eq!(repo.count_shares().unwrap(), 1);
}

#[test]
fn delete_share_reports_missing_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteShareRepository::new(&conn);

    repo.insert_share("gone", "{}").unwrap();
    repo.delete_share("gone").unwrap();
    assert!(repo.get_share("gone").unwrap().is_none());

    let err = repo.delete_share("gone").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
