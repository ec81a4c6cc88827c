use std::cmp::Ordering;

use crate::core::SteamUser;

/// Drop users the picker cannot show (missing profile, name or avatar).
pub fn retain_displayable(users: &mut Vec<SteamUser>) {
    users.retain(|user| {
        let keep = user.is_displayable();
        if !keep {
            tracing::warn!("User with Steam ID {} is missing info, dropping from list", user.steam_id);
        }
        keep
    });
}

/// Public profiles first, then online users, then by screen name.
pub fn compare_friends(a: &SteamUser, b: &SteamUser) -> Ordering {
    let a_public = a.visibility.is_public();
    let b_public = b.visibility.is_public();

    b_public
        .cmp(&a_public)
        .then_with(|| b.online.cmp(&a.online))
        .then_with(|| compare_names(&a.screen_name, &b.screen_name))
}

/// Case-insensitive, with the raw names as tie-break so the order is total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_friends(users: &mut [SteamUser]) {
    users.sort_by(compare_friends);
}

/// Trimmed, case-insensitive substring match on the screen name.
/// An empty query matches everyone.
pub fn matches_search(user: &SteamUser, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || user.screen_name.to_lowercase().contains(&query)
}
