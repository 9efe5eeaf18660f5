use questlog_core::db::open_db_in_memory;
use questlog_core::model::campaign::User;
use questlog_core::{
    CampaignId, CampaignService, CharacterClass, CharacterInput, CharacterKind, EntityService,
    EventInput, Hostility, LocationInput, OrganizationInput, RecordKind, ServiceError,
    SqliteStore,
};
use rusqlite::Connection;

fn seed_campaign(conn: &Connection) -> (User, CampaignId) {
    let campaigns = CampaignService::new(SqliteStore::try_new(conn).unwrap());
    let dm = campaigns.register_user("dungeon_master").unwrap();
    let campaign = campaigns
        .create_campaign(dm.id, "Curse of the Amber Crown", None, false)
        .unwrap();
    (dm, campaign.id)
}

fn location_input(name: &str) -> LocationInput {
    LocationInput {
        name: name.to_string(),
        ..LocationInput::default()
    }
}

#[test]
fn usernames_are_unique_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let campaigns = CampaignService::new(SqliteStore::try_new(&conn).unwrap());

    let user = campaigns.register_user("  Mira ").unwrap();
    assert_eq!(user.username, "Mira");

    let err = campaigns.register_user("mira").unwrap_err();
    assert!(matches!(err, ServiceError::UsernameTaken(_)));
    assert!(matches!(
        campaigns.register_user("   ").unwrap_err(),
        ServiceError::MalformedInput(_)
    ));
}

#[test]
fn membership_covers_dm_and_approved_users() {
    let conn = open_db_in_memory().unwrap();
    let (dm, campaign) = seed_campaign(&conn);
    let campaigns = CampaignService::new(SqliteStore::try_new(&conn).unwrap());
    let player = campaigns.register_user("player_one").unwrap();
    let stranger = campaigns.register_user("stranger").unwrap();

    assert!(campaigns.is_member(campaign, dm.id).unwrap());
    assert!(!campaigns.is_member(campaign, player.id).unwrap());

    let updated = campaigns.approve_member(campaign, player.id).unwrap();
    assert_eq!(updated.members, vec![player.id]);
    // Approving twice is a no-op.
    campaigns.approve_member(campaign, player.id).unwrap();

    let members = campaigns.list_members(campaign).unwrap();
    let names: Vec<&str> = members.iter().map(|user| user.username.as_str()).collect();
    assert_eq!(names, vec!["dungeon_master", "player_one"]);

    assert_eq!(campaigns.list_campaigns(player.id).unwrap().len(), 1);
    assert!(campaigns.list_campaigns(stranger.id).unwrap().is_empty());
}

#[test]
fn location_neighbors_are_symmetric() {
    let conn = open_db_in_memory().unwrap();
    let (_, campaign) = seed_campaign(&conn);
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());

    let harbor = entities
        .create_location(campaign, &location_input("Harbor"))
        .unwrap();
    let market = entities
        .create_location(
            campaign,
            &LocationInput {
                name: "Market".to_string(),
                hostility: Some("F".to_string()),
                neighbors: vec![harbor.id.to_string()],
                description: Some("Stalls and gossip".to_string()),
            },
        )
        .unwrap();

    assert_eq!(market.hostility, Hostility::Friendly);
    assert_eq!(market.neighbors, vec![harbor.id]);
    assert_eq!(harbor.hostility, Hostility::Neutral);

    let harbor = entities.get_location(campaign, harbor.id).unwrap();
    assert_eq!(harbor.neighbors, vec![market.id]);
}

#[test]
fn references_into_other_campaigns_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (dm, campaign) = seed_campaign(&conn);
    let campaigns = CampaignService::new(SqliteStore::try_new(&conn).unwrap());
    let other = campaigns
        .create_campaign(dm.id, "Side Quest", None, true)
        .unwrap();
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());

    let foreign = entities
        .create_location(other.id, &location_input("Elsewhere"))
        .unwrap();

    let err = entities
        .create_organization(
            campaign,
            &OrganizationInput {
                name: "Harbor Watch".to_string(),
                location: Some(foreign.id.to_string()),
                ..OrganizationInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ReferenceNotFound {
            kind: RecordKind::Location,
            id,
        } if id == *foreign.id.as_uuid()
    ));

    // Reads and deletes across campaigns behave like missing records.
    assert!(matches!(
        entities.get_location(campaign, foreign.id).unwrap_err(),
        ServiceError::ReferenceNotFound { .. }
    ));
    assert!(matches!(
        entities.delete_location(campaign, foreign.id).unwrap_err(),
        ServiceError::ReferenceNotFound { .. }
    ));
    assert!(entities.list_organizations(campaign).unwrap().is_empty());
}

#[test]
fn malformed_ids_and_codes_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let (_, campaign) = seed_campaign(&conn);
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());

    let bad_id = entities
        .create_location(
            campaign,
            &LocationInput {
                name: "Ruins".to_string(),
                neighbors: vec!["not-a-uuid".to_string()],
                ..LocationInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(bad_id, ServiceError::MalformedInput(_)));

    let bad_hostility = entities
        .create_location(
            campaign,
            &LocationInput {
                name: "Ruins".to_string(),
                hostility: Some("X".to_string()),
                ..LocationInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(bad_hostility, ServiceError::MalformedInput(_)));
    assert!(entities.list_locations(campaign).unwrap().is_empty());
}

#[test]
fn deleting_location_clears_organization_location() {
    let conn = open_db_in_memory().unwrap();
    let (_, campaign) = seed_campaign(&conn);
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());

    let keep = entities
        .create_location(campaign, &location_input("Keep"))
        .unwrap();
    let guard = entities
        .create_organization(
            campaign,
            &OrganizationInput {
                name: "Keep Guard".to_string(),
                location: Some(keep.id.to_string()),
                hostility: Some("H".to_string()),
                ..OrganizationInput::default()
            },
        )
        .unwrap();
    assert_eq!(guard.location, Some(keep.id));

    entities.delete_location(campaign, keep.id).unwrap();

    let guard = entities.get_organization(campaign, guard.id).unwrap();
    assert_eq!(guard.location, None);
    assert_eq!(guard.hostility, Hostility::Hostile);
}

#[test]
fn character_defaults_and_variant_rules() {
    let conn = open_db_in_memory().unwrap();
    let (dm, campaign) = seed_campaign(&conn);
    let campaigns = CampaignService::new(SqliteStore::try_new(&conn).unwrap());
    let outsider = campaigns.register_user("outsider").unwrap();
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());

    let npc = entities
        .create_character(
            campaign,
            &CharacterInput {
                name: "Old Tom".to_string(),
                ..CharacterInput::default()
            },
        )
        .unwrap();
    assert_eq!(npc.race, "Human");
    assert_eq!(npc.level, 0);
    assert_eq!(
        npc.kind,
        CharacterKind::NonPlayer {
            hostility: Hostility::Neutral
        }
    );

    let pc = entities
        .create_character(
            campaign,
            &CharacterInput {
                name: "Aria".to_string(),
                race: Some("Elf".to_string()),
                class: Some("W".to_string()),
                level: Some("3".to_string()),
                is_player_character: true,
                player: Some(dm.id.to_string()),
                related_characters: vec![npc.id.to_string()],
                ..CharacterInput::default()
            },
        )
        .unwrap();
    assert_eq!(pc.class, Some(CharacterClass::Wizard));
    assert_eq!(pc.level, 3);
    assert_eq!(pc.player(), Some(dm.id));

    let npc = entities.get_character(campaign, npc.id).unwrap();
    assert_eq!(npc.related_characters, vec![pc.id]);

    // Non-members cannot be assigned as players.
    let err = entities
        .create_character(
            campaign,
            &CharacterInput {
                name: "Intruder".to_string(),
                is_player_character: true,
                player: Some(outsider.id.to_string()),
                ..CharacterInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ReferenceNotFound {
            kind: RecordKind::User,
            ..
        }
    ));

    // Updates keep the variant.
    let updated = entities
        .update_character(
            campaign,
            npc.id,
            &CharacterInput {
                name: "Old Tom".to_string(),
                hostility: Some("H".to_string()),
                is_player_character: true,
                ..CharacterInput::default()
            },
        )
        .unwrap();
    assert_eq!(
        updated.kind,
        CharacterKind::NonPlayer {
            hostility: Hostility::Hostile
        }
    );
    // Full replacement clears the relation on both sides.
    assert!(updated.related_characters.is_empty());
    assert!(entities
        .get_character(campaign, pc.id)
        .unwrap()
        .related_characters
        .is_empty());
}

#[test]
fn events_require_start_and_ordered_range() {
    let conn = open_db_in_memory().unwrap();
    let (_, campaign) = seed_campaign(&conn);
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());

    let missing_start = entities
        .create_event(
            campaign,
            &EventInput {
                title: "Feast".to_string(),
                ..EventInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(missing_start, ServiceError::MalformedInput(_)));

    let inverted = entities
        .create_event(
            campaign,
            &EventInput {
                title: "Feast".to_string(),
                start: "1402-03-02T18:00".to_string(),
                end: Some("1402-03-01T18:00".to_string()),
                ..EventInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(inverted, ServiceError::MalformedInput(_)));

    let later = entities
        .create_event(
            campaign,
            &EventInput {
                title: "Coronation".to_string(),
                start: "1402-06-01T12:00".to_string(),
                ..EventInput::default()
            },
        )
        .unwrap();
    let earlier = entities
        .create_event(
            campaign,
            &EventInput {
                title: "Feast".to_string(),
                start: "1402-03-01T18:00".to_string(),
                end: Some("1402-03-01T23:30".to_string()),
                ..EventInput::default()
            },
        )
        .unwrap();

    let titles: Vec<String> = entities
        .list_events(campaign)
        .unwrap()
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(titles, vec!["Feast", "Coronation"]);

    entities.delete_event(campaign, earlier.id).unwrap();
    assert_eq!(entities.list_events(campaign).unwrap(), vec![later]);
}

#[test]
fn deleting_campaign_removes_its_records() {
    let conn = open_db_in_memory().unwrap();
    let (_, campaign) = seed_campaign(&conn);
    let entities = EntityService::new(SqliteStore::try_new(&conn).unwrap());
    entities
        .create_location(campaign, &location_input("Harbor"))
        .unwrap();

    let campaigns = CampaignService::new(SqliteStore::try_new(&conn).unwrap());
    campaigns.delete_campaign(campaign).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(matches!(
        campaigns.get_campaign(campaign).unwrap_err(),
        ServiceError::ReferenceNotFound {
            kind: RecordKind::Campaign,
            ..
        }
    ));
}
