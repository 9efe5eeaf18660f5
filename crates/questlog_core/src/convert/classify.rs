//! Eligibility classifier.
//!
//! Each structured type has "defining" optional fields on a note. The
//! classifier starts from every type and runs an ordered list of narrowing
//! steps over an explicit candidate set. Contradicting signals empty the set
//! instead of being tie-broken; once the set is empty no further step runs.

use crate::model::note::Note;
use crate::model::vocab::EntityType;
use log::trace;
use std::collections::{BTreeSet, HashSet};

/// Entity types a note may currently be converted into.
pub type EligibleTypes = BTreeSet<EntityType>;

/// One narrowing step: takes the surviving candidates, returns a subset.
pub type NarrowingStep = fn(&Note, EligibleTypes) -> EligibleTypes;

/// Steps in evaluation order.
pub const STEPS: [(&str, NarrowingStep); 3] = [
    ("time_range", narrow_by_time_range),
    ("character_traits", narrow_by_character_traits),
    ("location_count", narrow_by_location_count),
];

/// Returns every type the note may become. Never fails; a contradictory note
/// yields the empty set.
pub fn classify(note: &Note) -> EligibleTypes {
    let mut candidates: EligibleTypes = EntityType::ALL.into_iter().collect();
    for (name, step) in STEPS {
        if candidates.is_empty() {
            break;
        }
        candidates = step(note, candidates);
        trace!(
            "event=classify_step module=convert status=ok note={} step={name} remaining={}",
            note.id,
            candidates.len()
        );
    }
    candidates
}

/// A time range only fits an event, and conflicts with hostility outright.
/// Without any time an event is impossible (it needs a start).
pub fn narrow_by_time_range(note: &Note, candidates: EligibleTypes) -> EligibleTypes {
    if !note.has_time() {
        return without(candidates, EntityType::Event);
    }
    if note.hostility.is_some() {
        return EligibleTypes::new();
    }
    only(candidates, EntityType::Event)
}

/// Race, class and level are character-only signals.
pub fn narrow_by_character_traits(note: &Note, candidates: EligibleTypes) -> EligibleTypes {
    if !note.has_character_traits() {
        return candidates;
    }
    only(candidates, EntityType::Character)
}

/// Only a location can keep several linked locations (as neighbors).
pub fn narrow_by_location_count(note: &Note, candidates: EligibleTypes) -> EligibleTypes {
    let distinct: HashSet<_> = note.locations.iter().collect();
    if distinct.len() <= 1 {
        return candidates;
    }
    if candidates.contains(&EntityType::Location) {
        return only(candidates, EntityType::Location);
    }
    candidates
}

/// `{kind}` if it is still a candidate, else the empty set.
fn only(candidates: EligibleTypes, kind: EntityType) -> EligibleTypes {
    if candidates.contains(&kind) {
        EligibleTypes::from([kind])
    } else {
        EligibleTypes::new()
    }
}

fn without(mut candidates: EligibleTypes, kind: EntityType) -> EligibleTypes {
    candidates.remove(&kind);
    candidates
}

#[cfg(test)]
mod tests {
    use super::{
        classify, narrow_by_character_traits, narrow_by_location_count, narrow_by_time_range,
        EligibleTypes,
    };
    use crate::model::ids::{CampaignId, LocationId};
    use crate::model::note::Note;
    use crate::model::vocab::{CharacterClass, EntityType, Hostility};
    use chrono::{TimeZone, Utc};

    fn note() -> Note {
        Note::new(CampaignId::new(), "untitled")
    }

    fn all() -> EligibleTypes {
        EntityType::ALL.into_iter().collect()
    }

    #[test]
    fn bare_note_can_be_anything_but_an_event() {
        let eligible = classify(&note());
        assert_eq!(
            eligible,
            EligibleTypes::from([
                EntityType::Location,
                EntityType::Organization,
                EntityType::Character
            ])
        );
    }

    #[test]
    fn end_time_alone_is_a_time_signal() {
        let mut note = note();
        note.end = Some(Utc.with_ymd_and_hms(1402, 3, 1, 12, 0, 0).unwrap());
        assert_eq!(classify(&note), EligibleTypes::from([EntityType::Event]));
    }

    #[test]
    fn time_step_empties_on_hostility_conflict() {
        let mut note = note();
        note.start = Some(Utc.with_ymd_and_hms(1402, 3, 1, 12, 0, 0).unwrap());
        note.hostility = Some(Hostility::Friendly);
        assert!(narrow_by_time_range(&note, all()).is_empty());
    }

    #[test]
    fn hostility_without_time_keeps_three_candidates() {
        let mut note = note();
        note.hostility = Some(Hostility::Hostile);
        assert_eq!(classify(&note).len(), 3);
    }

    #[test]
    fn character_step_keeps_only_character() {
        let mut note = note();
        note.class = Some(CharacterClass::Wizard);
        let narrowed = narrow_by_character_traits(&note, all());
        assert_eq!(narrowed, EligibleTypes::from([EntityType::Character]));
    }

    #[test]
    fn character_step_empties_when_character_already_gone() {
        let mut note = note();
        note.level = Some(0);
        let narrowed =
            narrow_by_character_traits(&note, EligibleTypes::from([EntityType::Event]));
        assert!(narrowed.is_empty());
    }

    #[test]
    fn location_step_removes_location_but_keeps_the_rest() {
        let mut note = note();
        note.locations = vec![LocationId::new(), LocationId::new()];
        let narrowed = narrow_by_location_count(
            &note,
            EligibleTypes::from([EntityType::Organization, EntityType::Character]),
        );
        assert_eq!(
            narrowed,
            EligibleTypes::from([EntityType::Organization, EntityType::Character])
        );
    }

    #[test]
    fn duplicate_location_links_count_once() {
        let mut note = note();
        let location = LocationId::new();
        note.locations = vec![location, location];
        assert_eq!(narrow_by_location_count(&note, all()), all());
    }

    #[test]
    fn traits_and_many_locations_leave_character_only() {
        let mut note = note();
        note.race = Some("Elf".to_string());
        note.locations = vec![LocationId::new(), LocationId::new()];
        assert_eq!(classify(&note), EligibleTypes::from([EntityType::Character]));
    }

    #[test]
    fn time_and_many_locations_leave_event_only() {
        let mut note = note();
        note.start = Some(Utc.with_ymd_and_hms(1402, 3, 1, 12, 0, 0).unwrap());
        note.locations = vec![LocationId::new(), LocationId::new()];
        assert_eq!(classify(&note), EligibleTypes::from([EntityType::Event]));
    }
}
