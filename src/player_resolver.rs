use crate::error::SummaryError;
use serde_json::Value;

/// `info.participants` of either a match-details or a match-timeline record.
pub(crate) fn participants<'a>(
    record: &'a Value,
    record_name: &'static str,
) -> Result<&'a [Value], SummaryError> {
    record
        .get("info")
        .and_then(|info| info.get("participants"))
        .and_then(|list| list.as_array())
        .map(|list| list.as_slice())
        .ok_or_else(|| SummaryError::malformed(record_name, "missing info.participants array"))
}

/// First participant whose own `puuid` equals `puuid`.
pub(crate) fn find_participant<'a>(participants: &'a [Value], puuid: &str) -> Option<&'a Value> {
    participants.iter().find(|p| {
        p.get("puuid")
            .and_then(|value| value.as_str())
            .map(|value| value == puuid)
            .unwrap_or(false)
    })
}

/// Resolves the per-match `participantId` for `puuid`.
///
/// Identity is always compared against the participant entry itself, never by
/// position in `metadata.participants`, so details and timeline agree.
pub fn resolve_participant_id(
    record: &Value,
    record_name: &'static str,
    puuid: &str,
) -> Result<Option<i64>, SummaryError> {
    let participants = participants(record, record_name)?;

    let Some(participant) = find_participant(participants, puuid) else {
        return Ok(None);
    };

    participant
        .get("participantId")
        .and_then(|value| value.as_i64())
        .map(Some)
        .ok_or_else(|| SummaryError::malformed(record_name, "participant without participantId"))
}
