use crate::error::SummaryError;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

const FRAME_MILLIS: i64 = 60_000;

const PARTICIPANT_FRAME_DROP_KEYS: [&str; 7] = [
    "damageStats",
    "goldPerSecond",
    "minionsKilled",
    "jungleMinionsKilled",
    "totalGold",
    "xp",
    "timeEnemySpentControlled",
];

const CHAMPION_KILL_DROP_KEYS: [&str; 4] = [
    "timestamp",
    "killStreakLength",
    "victimDamageDealt",
    "victimDamageReceived",
];

const EVENT_DROP_KEYS: [&str; 1] = ["timestamp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    ChampionKill,
    ChampionSpecialKill,
    EliteMonsterKill,
    BuildingKill,
    TurretPlateDestroyed,
    FeatUpdate,
    DragonSoulGiven,
    WardPlaced,
    WardKill,
    ItemPurchased,
    ItemSold,
    ItemDestroyed,
    ItemUndo,
    LevelUp,
    SkillLevelUp,
    Other(String),
}

impl From<&str> for EventKind {
    fn from(raw: &str) -> Self {
        match raw {
            "CHAMPION_KILL" => EventKind::ChampionKill,
            "CHAMPION_SPECIAL_KILL" => EventKind::ChampionSpecialKill,
            "ELITE_MONSTER_KILL" => EventKind::EliteMonsterKill,
            "BUILDING_KILL" => EventKind::BuildingKill,
            "TURRET_PLATE_DESTROYED" => EventKind::TurretPlateDestroyed,
            "FEAT_UPDATE" => EventKind::FeatUpdate,
            "DRAGON_SOUL_GIVEN" => EventKind::DragonSoulGiven,
            "WARD_PLACED" => EventKind::WardPlaced,
            "WARD_KILL" => EventKind::WardKill,
            "ITEM_PURCHASED" => EventKind::ItemPurchased,
            "ITEM_SOLD" => EventKind::ItemSold,
            "ITEM_DESTROYED" => EventKind::ItemDestroyed,
            "ITEM_UNDO" => EventKind::ItemUndo,
            "LEVEL_UP" => EventKind::LevelUp,
            "SKILL_LEVEL_UP" => EventKind::SkillLevelUp,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl EventKind {
    pub fn of(event: &Value) -> Self {
        event
            .get("type")
            .and_then(|value| value.as_str())
            .map(EventKind::from)
            .unwrap_or_else(|| EventKind::Other(String::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    /// Whole minutes since game start.
    pub timestamp: i64,
    pub events: Vec<Value>,
    #[serde(rename = "participantFrames")]
    pub participant_frame: Value,
}

/// Per-event inclusion rule. ELITE_MONSTER_KILL and FEAT_UPDATE are kept for
/// every player regardless of who took the objective.
pub fn is_relevant(event: &Value, participant_id: i64) -> bool {
    match EventKind::of(event) {
        EventKind::ChampionKill => {
            id_field(event, "killerId") == Some(participant_id)
                || id_field(event, "victimId") == Some(participant_id)
                || assisted_by(event, participant_id)
        }
        EventKind::EliteMonsterKill | EventKind::FeatUpdate => true,
        EventKind::BuildingKill | EventKind::TurretPlateDestroyed => {
            id_field(event, "killerId") == Some(participant_id)
        }
        _ => false,
    }
}

/// Copy of `event` with the size-heavy fields removed.
pub fn prune_event(event: &Value) -> Value {
    match EventKind::of(event) {
        EventKind::ChampionKill => without_keys(event, &CHAMPION_KILL_DROP_KEYS),
        _ => without_keys(event, &EVENT_DROP_KEYS),
    }
}

pub fn filter_frame_events(events: &[Value], participant_id: i64) -> Vec<Value> {
    events
        .iter()
        .filter(|event| is_relevant(event, participant_id))
        .map(prune_event)
        .collect()
}

pub fn extract_player_timeline(
    match_timeline: &Value,
    participant_id: i64,
) -> Result<Vec<TimelineFrame>, SummaryError> {
    let frames = match_timeline
        .get("info")
        .and_then(|info| info.get("frames"))
        .and_then(|frames| frames.as_array())
        .ok_or_else(|| SummaryError::malformed("match timeline", "missing info.frames array"))?;

    let frame_key = participant_id.to_string();
    let mut output = Vec::new();

    for (idx, frame) in frames.iter().enumerate() {
        let Some(timestamp) = frame.get("timestamp").and_then(|v| v.as_i64()) else {
            return Err(SummaryError::malformed(
                "match timeline",
                format!("frame {} has no timestamp", idx),
            ));
        };

        let Some(events) = frame.get("events").and_then(|v| v.as_array()) else {
            return Err(SummaryError::malformed(
                "match timeline",
                format!("frame {} has no events array", idx),
            ));
        };

        let events = filter_frame_events(events, participant_id);
        if events.is_empty() {
            debug!(frame = idx, "no relevant events, skipping frame");
            continue;
        }

        let Some(participant_frame) = frame
            .get("participantFrames")
            .and_then(|frames| frames.get(&frame_key))
        else {
            return Err(SummaryError::malformed(
                "match timeline",
                format!("frame {} has no participant frame for {}", idx, frame_key),
            ));
        };

        output.push(TimelineFrame {
            timestamp: timestamp.div_euclid(FRAME_MILLIS),
            events,
            participant_frame: without_keys(participant_frame, &PARTICIPANT_FRAME_DROP_KEYS),
        });
    }

    Ok(output)
}

fn id_field(event: &Value, key: &str) -> Option<i64> {
    event.get(key).and_then(|value| value.as_i64())
}

fn assisted_by(event: &Value, participant_id: i64) -> bool {
    event
        .get("assistingParticipantIds")
        .and_then(|ids| ids.as_array())
        .map(|ids| ids.iter().any(|id| id.as_i64() == Some(participant_id)))
        .unwrap_or(false)
}

fn without_keys(value: &Value, drop: &[&str]) -> Value {
    match value.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !drop.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<String, Value>>(),
        ),
        None => value.clone(),
    }
}
