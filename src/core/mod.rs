pub mod game_candidate;
pub mod intersect_response;
pub mod player_count;
pub mod ranked_list;
pub mod steam_user;

pub use game_candidate::GameCandidate;
pub use intersect_response::{IntersectRequest, IntersectResponse};
pub use player_count::{PlayerCount, ZeroEncoding};
pub use ranked_list::{CapacityHint, RankedGame, RankedList, Tier};
pub use steam_user::{SteamUser, Visibility};
