use crate::error::SummaryError;
use crate::player_resolver::resolve_participant_id;
use crate::player_stats::{PlayerStats, extract_player_stats};
use crate::player_timeline::{TimelineFrame, extract_player_timeline};
use crate::riot_api::RiotClient;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player_stats: PlayerStats,
    pub player_timeline: Vec<TimelineFrame>,
}

/// Builds the summary from already-fetched records. Never mutates its inputs.
pub fn summarize_player(
    puuid: &str,
    match_id: &str,
    match_details: &Value,
    match_timeline: &Value,
) -> Result<PlayerSummary, SummaryError> {
    let not_found = || SummaryError::PlayerNotFound {
        puuid: puuid.to_string(),
        match_id: match_id.to_string(),
    };

    let Some(player_stats) = extract_player_stats(match_details, puuid)? else {
        warn!(%puuid, %match_id, "player absent from match details");
        return Err(not_found());
    };
    let Some(details_id) = resolve_participant_id(match_details, "match details", puuid)? else {
        return Err(not_found());
    };

    let Some(participant_id) = resolve_participant_id(match_timeline, "match timeline", puuid)?
    else {
        warn!(%puuid, %match_id, "player absent from match timeline");
        return Err(not_found());
    };

    if details_id != participant_id {
        return Err(SummaryError::InconsistentParticipant {
            details: details_id,
            timeline: participant_id,
        });
    }

    let player_timeline = extract_player_timeline(match_timeline, participant_id)?;

    Ok(PlayerSummary {
        player_stats,
        player_timeline,
    })
}

/// Fetches details and timeline concurrently, then summarizes.
pub async fn fetch_player_summary(
    client: &RiotClient,
    puuid: &str,
    match_id: &str,
) -> Result<PlayerSummary, SummaryError> {
    let (match_details, match_timeline) = tokio::try_join!(
        client.get_match_json(match_id),
        client.get_match_timeline_json(match_id)
    )?;

    let summary = summarize_player(puuid, match_id, &match_details, &match_timeline)?;
    info!(
        %puuid,
        %match_id,
        frames = summary.player_timeline.len(),
        "built player summary"
    );

    Ok(summary)
}
