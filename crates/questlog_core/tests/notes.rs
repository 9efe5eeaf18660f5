use questlog_core::db::open_db_in_memory;
use questlog_core::{
    CampaignId, CampaignService, CharacterClass, EntityService, Hostility, LocationInput,
    NoteInput, NoteService, RecordKind, ServiceError, SqliteStore,
};
use rusqlite::Connection;

fn seed_campaign(conn: &Connection) -> CampaignId {
    let campaigns = CampaignService::new(SqliteStore::try_new(conn).unwrap());
    let dm = campaigns.register_user("dm").unwrap();
    campaigns
        .create_campaign(dm.id, "Salt Marsh", None, false)
        .unwrap()
        .id
}

fn titled(title: &str) -> NoteInput {
    NoteInput {
        title: title.to_string(),
        ..NoteInput::default()
    }
}

#[test]
fn blank_fields_are_stored_as_unset() {
    let conn = open_db_in_memory().unwrap();
    let campaign = seed_campaign(&conn);
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let note = notes
        .create_note(
            campaign,
            &NoteInput {
                title: "Rumor".to_string(),
                start: Some(" ".to_string()),
                race: Some("".to_string()),
                class: Some("".to_string()),
                level: Some("".to_string()),
                hostility: Some("".to_string()),
                content: Some("   ".to_string()),
                ..NoteInput::default()
            },
        )
        .unwrap();

    assert_eq!(note.start, None);
    assert_eq!(note.race, None);
    assert_eq!(note.class, None);
    assert_eq!(note.level, None);
    assert_eq!(note.hostility, None);
    assert_eq!(note.content, None);
}

#[test]
fn note_fields_round_trip_with_link_order() {
    let conn = open_db_in_memory().unwrap();
    let campaign = seed_campaign(&conn);
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let mut locations = Vec::new();
    for name in ["Tide Caves", "Abbey", "Lighthouse"] {
        let location = entities
            .create_location(
                campaign,
                &LocationInput {
                    name: name.to_string(),
                    ..LocationInput::default()
                },
            )
            .unwrap();
        locations.push(location.id);
    }

    let note = notes
        .create_note(
            campaign,
            &NoteInput {
                title: "Smugglers".to_string(),
                class: Some("Rg".to_string()),
                level: Some("4".to_string()),
                hostility: Some("?".to_string()),
                locations: locations.iter().rev().map(|id| id.to_string()).collect(),
                content: Some("Seen near the cliffs.".to_string()),
                ..NoteInput::default()
            },
        )
        .unwrap();

    let loaded = notes.get_note(campaign, note.id).unwrap();
    assert_eq!(loaded.class, Some(CharacterClass::Rogue));
    assert_eq!(loaded.level, Some(4));
    assert_eq!(loaded.hostility, Some(Hostility::Unknown));
    assert_eq!(
        loaded.locations,
        locations.iter().rev().copied().collect::<Vec<_>>()
    );
    assert_eq!(loaded.content.as_deref(), Some("Seen near the cliffs."));
}

#[test]
fn inverted_time_range_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let campaign = seed_campaign(&conn);
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let err = notes
        .create_note(
            campaign,
            &NoteInput {
                title: "Storm".to_string(),
                start: Some("1402-03-02T08:00".to_string()),
                end: Some("1402-03-01T08:00".to_string()),
                ..NoteInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::MalformedInput(_)));
    assert!(notes.list_notes(campaign).unwrap().is_empty());
}

#[test]
fn update_replaces_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let campaign = seed_campaign(&conn);
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let note = notes
        .create_note(
            campaign,
            &NoteInput {
                title: "Draft".to_string(),
                race: Some("Lizardfolk".to_string()),
                ..NoteInput::default()
            },
        )
        .unwrap();

    let updated = notes
        .update_note(campaign, note.id, &titled("Final"))
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.race, None);
    assert_eq!(updated.id, note.id);
}

#[test]
fn notes_are_scoped_to_their_campaign() {
    let conn = open_db_in_memory().unwrap();
    let campaign = seed_campaign(&conn);
    let campaigns = CampaignService::new(SqliteStore::try_new(&conn).unwrap());
    let other_dm = campaigns.register_user("other_dm").unwrap();
    let other = campaigns
        .create_campaign(other_dm.id, "Elsewhere", None, false)
        .unwrap();
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let note = notes.create_note(campaign, &titled("Secret")).unwrap();

    assert!(matches!(
        notes.get_note(other.id, note.id).unwrap_err(),
        ServiceError::ReferenceNotFound {
            kind: RecordKind::Note,
            ..
        }
    ));
    assert!(notes.delete_note(other.id, note.id).is_err());
    assert!(notes.list_notes(other.id).unwrap().is_empty());

    notes.delete_note(campaign, note.id).unwrap();
    assert!(notes.list_notes(campaign).unwrap().is_empty());
}

#[test]
fn notes_in_unknown_campaign_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    seed_campaign(&conn);
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let err = notes
        .create_note(CampaignId::new(), &titled("Lost"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ReferenceNotFound {
            kind: RecordKind::Campaign,
            ..
        }
    ));
}
