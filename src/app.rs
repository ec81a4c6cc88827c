//! Friend picker / results view state.
//!
//! All UI state lives in [`AppState`]. Event handlers turn input into a
//! [`Message`], [`update`] applies it and returns the [`Effect`]s the shell
//! has to carry out (alerts, network requests, animation timers).

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::core::{IntersectResponse, RankedList, SteamUser};
use crate::error::{EngineError, Result};
use crate::ranking::{matches_search, retain_displayable, sort_friends, Ranker, RankingContext, TierRanker};

/// Length of the slide animation between the two panes
pub const SLIDE_DURATION: Duration = Duration::from_millis(600);

pub const EMPTY_FRIEND_LIST: &str = "Your Friend List is empty! You need at least one friend to compare games with!";
pub const NO_SHARED_GAMES: &str = "Looks like these users don't have any games shared between all of them.";
pub const PRIVATE_FRIEND_LIST: &str = "Your Friend List is not publicly accessible, and cannot be retrieved. \
                                       Please set your Friend list visibility to Public and refresh the page.";
pub const FRIEND_LIST_TIMEOUT: &str = "Steam took too long to return your Friend List. Please refresh the page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Users,
    SlidingToGames,
    Games,
    SlidingToUsers,
}

#[derive(Debug, Clone)]
pub enum Message {
    FriendsLoaded(Vec<SteamUser>),
    ToggleUser(u64),
    Submit,
    SlideFinished,
    Back,
    ResultsArrived(IntersectResponse),
    RequestFailed(String),
    Search(String),
}

impl Message {
    /// Turn the outcome of a friend list fetch into a message
    pub fn friends_fetched(result: Result<Vec<SteamUser>>) -> Self {
        match result {
            Ok(users) => Message::FriendsLoaded(users),
            Err(EngineError::PrivateFriendsList(_)) => Message::RequestFailed(PRIVATE_FRIEND_LIST.to_string()),
            Err(EngineError::Timeout { .. }) => Message::RequestFailed(FRIEND_LIST_TIMEOUT.to_string()),
            Err(e) => {
                tracing::error!("Friend list fetch failed: {}", e);
                Message::RequestFailed(e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Alert(String),
    /// Load the friend list of the signed-in user
    FetchFriends(u64),
    FetchIntersection(Vec<u64>),
    /// Deliver `Message::SlideFinished` after the delay
    ScheduleSlide(Duration),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The signed-in user
    pub main_user: Option<SteamUser>,
    /// Friends in display order
    pub friends: Vec<SteamUser>,
    pub selected: BTreeSet<u64>,
    pub fetching: bool,
    pub view: View,
    pub error: Option<String>,
    pub results: Option<RankedList>,
    pub search: String,
}

impl AppState {
    /// Start with the signed-in user, pre-selected when their profile is public
    pub fn new(main_user: SteamUser) -> Self {
        let mut selected = BTreeSet::new();
        if main_user.is_selectable() {
            selected.insert(main_user.steam_id);
        }

        Self {
            main_user: Some(main_user),
            selected,
            ..Self::default()
        }
    }

    /// Like [`AppState::new`], plus the effects that populate the picker
    pub fn start(main_user: SteamUser) -> (Self, Vec<Effect>) {
        let fetch = Effect::FetchFriends(main_user.steam_id);
        (Self::new(main_user), vec![fetch])
    }

    pub fn user(&self, steam_id: u64) -> Option<&SteamUser> {
        self.main_user
            .iter()
            .chain(self.friends.iter())
            .find(|u| u.steam_id == steam_id)
    }

    /// Screen name, or the id when the user is not in the list
    pub fn display_name(&self, steam_id: u64) -> String {
        self.user(steam_id)
            .map(|u| u.screen_name.clone())
            .unwrap_or_else(|| steam_id.to_string())
    }

    /// Friends matching the current search
    pub fn visible_friends(&self) -> impl Iterator<Item = &SteamUser> {
        self.friends.iter().filter(|u| matches_search(u, &self.search))
    }

    pub fn can_submit(&self, config: &EngineConfig) -> bool {
        !self.fetching && self.selected.len() >= config.min_group_size
    }

    pub fn submit_label(&self, config: &EngineConfig) -> String {
        if self.fetching {
            return "Fetching...".to_string();
        }
        match config.min_group_size.saturating_sub(self.selected.len()) {
            0 => "Find Games".to_string(),
            1 => "Select One User".to_string(),
            2 => "Select Two Users".to_string(),
            n => format!("Select {} Users", n),
        }
    }
}

/// Apply one message to the state.
pub fn update(state: &mut AppState, message: Message, config: &EngineConfig) -> Vec<Effect> {
    match message {
        Message::FriendsLoaded(mut users) => {
            retain_displayable(&mut users);
            if users.is_empty() {
                state.error = Some(EMPTY_FRIEND_LIST.to_string());
                return Vec::new();
            }
            sort_friends(&mut users);
            state.friends = users;
            Vec::new()
        }

        Message::ToggleUser(steam_id) => toggle_user(state, steam_id, config),

        Message::Submit => {
            if !state.can_submit(config) {
                return Vec::new();
            }

            state.error = None;
            state.results = None;
            state.fetching = true;

            let mut effects = Vec::new();
            if matches!(state.view, View::Users | View::SlidingToUsers) {
                state.view = View::SlidingToGames;
                effects.push(Effect::ScheduleSlide(SLIDE_DURATION));
            }
            effects.push(Effect::FetchIntersection(state.selected.iter().copied().collect()));
            effects
        }

        Message::SlideFinished => {
            state.view = match state.view {
                View::SlidingToGames => View::Games,
                View::SlidingToUsers => View::Users,
                settled => settled,
            };
            Vec::new()
        }

        Message::Back => {
            if state.fetching || !matches!(state.view, View::Games | View::SlidingToGames) {
                return Vec::new();
            }
            state.view = View::SlidingToUsers;
            vec![Effect::ScheduleSlide(SLIDE_DURATION)]
        }

        Message::ResultsArrived(response) => {
            state.fetching = false;
            match response {
                IntersectResponse::Games { games, .. } => {
                    let ctx = RankingContext::new(state.selected.len());
                    let list = TierRanker::new().rank(games, ctx);
                    if list.is_empty() {
                        state.error = Some(NO_SHARED_GAMES.to_string());
                    }
                    state.results = Some(list);
                }
                other => {
                    let name = other
                        .user()
                        .map(|id| state.display_name(id))
                        .unwrap_or_default();
                    state.error = other.user_message(&name);
                }
            }
            Vec::new()
        }

        Message::RequestFailed(reason) => {
            state.fetching = false;
            state.error = Some(reason);
            Vec::new()
        }

        Message::Search(query) => {
            state.search = query;
            Vec::new()
        }
    }
}

fn toggle_user(state: &mut AppState, steam_id: u64, config: &EngineConfig) -> Vec<Effect> {
    let Some(user) = state.user(steam_id) else {
        return vec![Effect::Alert(format!("Unknown user {}", steam_id))];
    };

    if let Some(reason) = user.visibility.unavailable_reason() {
        return vec![Effect::Alert(reason)];
    }

    if state.fetching {
        return vec![Effect::Alert("Cannot modify selected users while fetching".to_string())];
    }

    if state.selected.remove(&steam_id) {
        return Vec::new();
    }

    if state.selected.len() >= config.max_group_size {
        return vec![Effect::Alert(format!(
            "Only {} users can be intersected at a time.",
            config.max_group_size
        ))];
    }

    state.selected.insert(steam_id);
    Vec::new()
}
