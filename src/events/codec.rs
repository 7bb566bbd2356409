//! Lossless persisted forms of an event log.
//!
//! - JSON Lines: one [`GameEvent`] per line, human-readable
//! - bincode: compact binary, for bulk self-play logs

use crate::core::CodecError;

use super::event::GameEvent;

/// Render a log as JSON Lines (trailing newline included).
pub fn to_json_lines(events: &[GameEvent]) -> Result<String, CodecError> {
    let mut out = String::new();
    for (i, event) in events.iter().enumerate() {
        let line = serde_json::to_string(event)
            .map_err(|source| CodecError::Json { line: i + 1, source })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Parse a JSON Lines log. Blank lines are skipped; line numbers in errors
/// are 1-based.
pub fn from_json_lines(text: &str) -> Result<Vec<GameEvent>, CodecError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| CodecError::Json { line: i + 1, source })
        })
        .collect()
}

/// Encode a log with bincode.
pub fn encode_log(events: &[GameEvent]) -> Result<Vec<u8>, CodecError> {
    Ok(bincode::serialize(events)?)
}

/// Decode a log produced by [`encode_log`].
pub fn decode_log(bytes: &[u8]) -> Result<Vec<GameEvent>, CodecError> {
    Ok(bincode::deserialize(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bid, PlayerId, PlayerMap, RoundOutcome};
    use crate::events::event::EventPayload;
    use smallvec::smallvec;

    fn sample_log() -> Vec<GameEvent> {
        let payloads = vec![
            EventPayload::PlayerLabeled {
                player: PlayerId::new(1),
                label: Some("scripted".to_string()),
            },
            EventPayload::RoundStarted {
                starting_player: PlayerId::new(0),
                dice_counts: PlayerMap::from_vec(vec![2, 3]),
            },
            EventPayload::DiceRolled {
                player: PlayerId::new(0),
                dice: smallvec![3, 5],
            },
            EventPayload::BidPlaced {
                player: PlayerId::new(0),
                bid: Bid::new(2, 3),
            },
            EventPayload::RoundEnded {
                outcome: RoundOutcome {
                    bid: Bid::new(2, 3),
                    caller: PlayerId::new(1),
                    bidder: PlayerId::new(0),
                    match_count: 3,
                    was_true: true,
                    winner: PlayerId::new(0),
                    loser: PlayerId::new(1),
                },
            },
        ];
        payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| GameEvent {
                game_id: "abc".to_string(),
                sequence: i as u64,
                round_index: 1,
                turn_index: 0,
                timestamp_ms: 17,
                payload,
                player_type: Some("random".to_string()),
            })
            .collect()
    }

    #[test]
    fn test_json_lines_round_trip() {
        let log = sample_log();
        let text = to_json_lines(&log).unwrap();
        assert_eq!(text.lines().count(), log.len());
        assert_eq!(from_json_lines(&text).unwrap(), log);
    }

    #[test]
    fn test_json_lines_reports_line() {
        let mut text = to_json_lines(&sample_log()).unwrap();
        text.push_str("\n{not json}\n");

        match from_json_lines(&text) {
            Err(CodecError::Json { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected a json error, got {other:?}"),
        }
    }

    #[test]
    fn test_bincode_round_trip() {
        let log = sample_log();
        let bytes = encode_log(&log).unwrap();
        assert_eq!(decode_log(&bytes).unwrap(), log);
        assert!(decode_log(&bytes[..bytes.len() / 2]).is_err());
    }
}
