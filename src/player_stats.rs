use crate::error::SummaryError;
use crate::player_resolver::{find_participant, participants};
use serde::Serialize;
use serde_json::{Map, Value};

/// Challenge keys forwarded downstream; everything else in `challenges` is dropped.
pub const CHALLENGES_KEEP_KEYS: [&str; 27] = [
    // core performance
    "kda",
    "damagePerMinute",
    "teamDamagePercentage",
    "killParticipation",
    "goldPerMinute",
    "visionScorePerMinute",
    // objectives
    "baronTakedowns",
    "dragonTakedowns",
    "riftHeraldTakedowns",
    "turretTakedowns",
    "voidMonsterKill",
    // skirmishing
    "soloKills",
    "killsNearEnemyTurret",
    "killsUnderOwnTurret",
    "outnumberedKills",
    "immobilizeAndKillWithAlly",
    "enemyChampionImmobilizations",
    // laning
    "laneMinionsFirst10Minutes",
    "maxCsAdvantageOnLaneOpponent",
    "maxLevelLeadLaneOpponent",
    // survivability
    "damageTakenOnTeamPercentage",
    "survivedSingleDigitHpCount",
    "survivedThreeImmobilizesInFight",
    // vision
    "controlWardsPlaced",
    "stealthWardsPlaced",
    "wardTakedowns",
    "visionScoreAdvantageLaneOpponent",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub champion: Value,
    pub role: Value,
    pub champ_level: Value,
    pub kills: Value,
    pub deaths: Value,
    pub assists: Value,
    pub total_gold: Value,
    pub total_damage: Value,
    pub vision_score: Value,
    pub wards_placed: Value,
    pub detector_wards_placed: Value,
    pub cs: Option<i64>,
    pub runes: Value,
    pub challenges: Map<String, Value>,
    pub win: Value,
}

pub fn extract_player_stats(
    match_details: &Value,
    puuid: &str,
) -> Result<Option<PlayerStats>, SummaryError> {
    let participants = participants(match_details, "match details")?;

    Ok(find_participant(participants, puuid).map(player_stats_from_participant))
}

pub(crate) fn player_stats_from_participant(participant: &Value) -> PlayerStats {
    let field = |key: &str| participant.get(key).cloned().unwrap_or(Value::Null);

    PlayerStats {
        champion: field("championName"),
        role: field("teamPosition"),
        champ_level: field("champLevel"),
        kills: field("kills"),
        deaths: field("deaths"),
        assists: field("assists"),
        total_gold: field("goldEarned"),
        total_damage: field("totalDamageDealtToChampions"),
        vision_score: field("visionScore"),
        wards_placed: field("wardsPlaced"),
        detector_wards_placed: field("detectorWardsPlaced"),
        cs: creep_score(participant),
        runes: field("perks"),
        challenges: filter_challenges(participant.get("challenges")),
        win: field("win"),
    }
}

fn creep_score(participant: &Value) -> Option<i64> {
    let lane = participant.get("totalMinionsKilled")?.as_i64()?;
    let neutral = participant.get("neutralMinionsKilled")?.as_i64()?;
    lane.checked_add(neutral)
}

fn filter_challenges(challenges: Option<&Value>) -> Map<String, Value> {
    let Some(challenges) = challenges.and_then(|c| c.as_object()) else {
        return Map::new();
    };

    challenges
        .iter()
        .filter(|(key, _)| CHALLENGES_KEEP_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
