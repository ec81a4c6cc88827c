use serde::{Deserialize, Serialize};

use crate::core::game_candidate::deserialize_id;
use crate::core::{GameCandidate, ZeroEncoding};
use crate::error::{EngineError, Result};

/// Wire error codes of the intersection endpoint
pub mod errcode {
    pub const FAILURE: i64 = -1;
    pub const OK: i64 = 0;
    pub const PRIVATE_LIBRARY: i64 = 1;
    pub const EMPTY_LIBRARY: i64 = 2;
}

const UNKNOWN_FAILURE: &str = "An unknown error occurred. Please try again later.";
pub const BAD_REQUEST: &str = "Received a bad request. Please refresh the page and try again.";

/// Body of an intersection request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntersectRequest {
    /// Users to intersect, as numbers or stringified numbers
    #[serde(deserialize_with = "deserialize_ids")]
    pub steamids: Vec<u64>,

    /// Count played free games as owned
    #[serde(default)]
    pub include_free_games: bool,
}

impl IntersectRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn deserialize_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Id(#[serde(deserialize_with = "deserialize_id")] u64);

    Ok(Vec::<Id>::deserialize(deserializer)?.into_iter().map(|Id(id)| id).collect())
}

/// Decoded result of an intersection request
#[derive(Debug, Clone, PartialEq)]
pub enum IntersectResponse {
    /// Games owned by every selected user, in arrival order
    Games { message: String, games: Vec<GameCandidate> },
    /// The user's games list is not visible
    PrivateLibrary { user: u64 },
    /// The user owns no games
    EmptyLibrary { user: u64 },
    /// Anything else, with a message to display
    Failure { message: String },
}

#[derive(Debug, Deserialize)]
struct IncomingResponse {
    errcode: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id")]
    user: u64,
    #[serde(default)]
    games: Vec<GameCandidate>,
}

#[derive(Debug, Serialize)]
struct OutgoingResponse<'a> {
    errcode: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    games: Option<&'a [GameCandidate]>,
}

impl IntersectResponse {
    pub fn success(games: Vec<GameCandidate>) -> Self {
        IntersectResponse::Games {
            message: "Intersected successfully".to_string(),
            games,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        IntersectResponse::Failure { message: message.into() }
    }

    /// Reply to a request body that could not be read
    pub fn bad_request() -> Self {
        Self::failure(BAD_REQUEST)
    }

    /// Decode a payload, applying the `0` player count rule to every game
    pub fn from_json(json: &str, encoding: ZeroEncoding) -> Result<Self> {
        let raw: IncomingResponse = serde_json::from_str(json)?;

        let response = match raw.errcode {
            errcode::OK => IntersectResponse::Games {
                message: raw.message.unwrap_or_default(),
                games: raw.games.into_iter().map(|g| g.normalized(encoding)).collect(),
            },
            errcode::PRIVATE_LIBRARY => IntersectResponse::PrivateLibrary { user: raw.user },
            errcode::EMPTY_LIBRARY => IntersectResponse::EmptyLibrary { user: raw.user },
            code => {
                tracing::debug!("Intersect failed with errcode {}", code);
                IntersectResponse::Failure {
                    message: raw.message.unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
                }
            }
        };

        Ok(response)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn outgoing(&self) -> OutgoingResponse<'_> {
        match self {
            IntersectResponse::Games { message, games } => OutgoingResponse {
                errcode: errcode::OK,
                message: Some(message.as_str()),
                user: None,
                games: Some(games.as_slice()),
            },
            IntersectResponse::PrivateLibrary { user } => OutgoingResponse {
                errcode: errcode::PRIVATE_LIBRARY,
                message: None,
                user: Some(user.to_string()),
                games: None,
            },
            IntersectResponse::EmptyLibrary { user } => OutgoingResponse {
                errcode: errcode::EMPTY_LIBRARY,
                message: None,
                user: Some(user.to_string()),
                games: None,
            },
            IntersectResponse::Failure { message } => OutgoingResponse {
                errcode: errcode::FAILURE,
                message: Some(message.as_str()),
                user: None,
                games: None,
            },
        }
    }

    pub fn errcode(&self) -> i64 {
        match self {
            IntersectResponse::Games { .. } => errcode::OK,
            IntersectResponse::PrivateLibrary { .. } => errcode::PRIVATE_LIBRARY,
            IntersectResponse::EmptyLibrary { .. } => errcode::EMPTY_LIBRARY,
            IntersectResponse::Failure { .. } => errcode::FAILURE,
        }
    }

    /// The user a library error refers to
    pub fn user(&self) -> Option<u64> {
        match self {
            IntersectResponse::PrivateLibrary { user } | IntersectResponse::EmptyLibrary { user } => Some(*user),
            _ => None,
        }
    }

    /// Explanation for the error cases; `name` is the screen name of [`Self::user`]
    pub fn user_message(&self, name: &str) -> Option<String> {
        match self {
            IntersectResponse::Games { .. } => None,
            IntersectResponse::PrivateLibrary { .. } => Some(format!(
                "Cannot access the games list of {name}. Either their Game details visibility is not Public, \
                 or they are being rate-limited by Steam. Ask {name} to set their Game details to Public, \
                 remove {name} from the selected users, or try again later."
            )),
            IntersectResponse::EmptyLibrary { .. } => Some(format!(
                "{name} has an empty games list, and cannot possibly share any common games with the selected users. \
                 Please deselect {name} and try again."
            )),
            IntersectResponse::Failure { message } => Some(message.clone()),
        }
    }
}

impl Serialize for IntersectResponse {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.outgoing().serialize(serializer)
    }
}

impl From<EngineError> for IntersectResponse {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PrivateLibrary(user) => IntersectResponse::PrivateLibrary { user },
            EngineError::EmptyLibrary(user) => IntersectResponse::EmptyLibrary { user },
            EngineError::InvalidGroup { size, min, .. } if size < min => {
                IntersectResponse::failure(format!("Must have at least {min} users to intersect games."))
            }
            EngineError::InvalidGroup { max, .. } => {
                IntersectResponse::failure(format!("Games intersection is capped at {max} users."))
            }
            EngineError::Timeout { .. } => {
                IntersectResponse::failure("Steam took too long to respond. Please try again later.")
            }
            other => {
                tracing::error!("Intersect failed: {}", other);
                IntersectResponse::failure(UNKNOWN_FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerCount;

    #[test]
    fn test_decode_success_with_legacy_zero() {
        let json = r#"{
            "message": "Intersected successfully",
            "errcode": 0,
            "games": [
                {"steam_id": 1, "name": "Old", "supported_players": "0"},
                {"steam_id": 2, "name": "New", "supported_players": "?"},
                {"steam_id": 3, "name": "Four", "supported_players": "4"}
            ]
        }"#;

        let response = IntersectResponse::from_json(json, ZeroEncoding::Unknown).unwrap();
        let IntersectResponse::Games { games, .. } = response else {
            panic!("expected games");
        };
        let counts: Vec<PlayerCount> = games.iter().map(|g| g.supported_players).collect();
        assert_eq!(counts, vec![PlayerCount::Unknown, PlayerCount::Unknown, PlayerCount::Known(4)]);

        let response = IntersectResponse::from_json(json, ZeroEncoding::Known).unwrap();
        let IntersectResponse::Games { games, .. } = response else {
            panic!("expected games");
        };
        assert_eq!(games[0].supported_players, PlayerCount::Known(0));
    }

    #[test]
    fn test_null_fields_do_not_reject_payload() {
        use crate::ranking::{Ranker, RankingContext, TierRanker};

        let json = r#"{
            "errcode": 0,
            "games": [
                {"steam_id": 1, "name": "Good", "supported_players": 4, "cover_id": null},
                {"steam_id": 2, "name": null, "supported_players": 4}
            ]
        }"#;

        let response = IntersectResponse::from_json(json, ZeroEncoding::Unknown).unwrap();
        let IntersectResponse::Games { games, .. } = response else {
            panic!("expected games");
        };
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].cover_url(), None);

        let list = TierRanker::new().rank(games, RankingContext::new(2));
        assert_eq!(list.names(), vec!["Good"]);
        assert_eq!(list.dropped, 1);
    }

    #[test]
    fn test_decode_errors() {
        let private = IntersectResponse::from_json(r#"{"user": "42", "errcode": 1}"#, ZeroEncoding::Unknown).unwrap();
        assert_eq!(private, IntersectResponse::PrivateLibrary { user: 42 });
        assert_eq!(private.user(), Some(42));

        let empty = IntersectResponse::from_json(r#"{"user": "7", "errcode": 2}"#, ZeroEncoding::Unknown).unwrap();
        assert_eq!(empty, IntersectResponse::EmptyLibrary { user: 7 });

        let failure = IntersectResponse::from_json(
            r#"{"message": "Games intersection is capped at 10 users.", "errcode": -1}"#,
            ZeroEncoding::Unknown,
        )
        .unwrap();
        assert_eq!(failure.user_message("x").as_deref(), Some("Games intersection is capped at 10 users."));

        let odd = IntersectResponse::from_json(r#"{"errcode": 99}"#, ZeroEncoding::Unknown).unwrap();
        assert_eq!(odd, IntersectResponse::failure(UNKNOWN_FAILURE));
    }

    #[test]
    fn test_decode_request() {
        let request =
            IntersectRequest::from_json(r#"{"steamids": ["76561197960287930", 42], "include_free_games": true}"#)
                .unwrap();
        assert_eq!(request.steamids, vec![76561197960287930, 42]);
        assert!(request.include_free_games);

        let request = IntersectRequest::from_json(r#"{"steamids": [1, 2]}"#).unwrap();
        assert!(!request.include_free_games);

        assert!(IntersectRequest::from_json(r#"{"steamids": ["abc"]}"#).is_err());
        assert!(IntersectRequest::from_json(r#"{"users": [1, 2]}"#).is_err());
        assert!(IntersectRequest::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_bad_request_payload() {
        let json = IntersectResponse::bad_request().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["errcode"], -1);
        assert_eq!(value["message"], BAD_REQUEST);
    }

    #[test]
    fn test_encode_user_as_string() {
        let json = IntersectResponse::PrivateLibrary { user: 42 }.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["errcode"], 1);
        assert_eq!(value["user"], "42");
        assert!(value.get("games").is_none());
    }

    #[test]
    fn test_from_engine_error() {
        let response: IntersectResponse = EngineError::InvalidGroup { size: 1, min: 2, max: 10 }.into();
        assert_eq!(response, IntersectResponse::failure("Must have at least 2 users to intersect games."));

        let response: IntersectResponse = EngineError::InvalidGroup { size: 11, min: 2, max: 10 }.into();
        assert_eq!(response, IntersectResponse::failure("Games intersection is capped at 10 users."));

        let response: IntersectResponse = EngineError::EmptyLibrary(5).into();
        assert_eq!(response.errcode(), errcode::EMPTY_LIBRARY);
    }

    #[test]
    fn test_user_message_mentions_name() {
        let msg = IntersectResponse::EmptyLibrary { user: 5 }.user_message("gabe").unwrap();
        assert!(msg.starts_with("gabe has an empty games list"));
    }
}
