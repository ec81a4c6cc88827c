use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{GameCandidate, RankedGame, SteamUser, Tier, ZeroEncoding};
use crate::ranking::{retain_displayable, sort_friends as order_friends, Ranker, RankingContext, TierRanker};

fn value_error(e: impl ToString) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

/// Convert RankedGame to Python dict
fn ranked_game_to_py(py: Python, ranked: &RankedGame) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("steam_id", ranked.game.steam_id)?;
    dict.set_item("igdb_id", ranked.game.igdb_id)?;
    dict.set_item("name", &ranked.game.name)?;
    dict.set_item("supported_players", ranked.game.supported_players.label())?;
    dict.set_item("cover_url", ranked.game.cover_url())?;
    dict.set_item("adequate", ranked.tier == Tier::Adequate)?;
    dict.set_item("short", ranked.hint.is_short())?;
    dict.set_item("title", ranked.hint.title())?;
    Ok(dict.into())
}

/// Rank a JSON array of games for `group_size` users
#[pyfunction]
#[pyo3(signature = (games_json, group_size, legacy_zero = true))]
fn rank_games(py: Python, games_json: &str, group_size: usize, legacy_zero: bool) -> PyResult<PyObject> {
    let encoding = if legacy_zero { ZeroEncoding::Unknown } else { ZeroEncoding::Known };

    let games: Vec<GameCandidate> = serde_json::from_str(games_json).map_err(value_error)?;
    let games = games.into_iter().map(|g| g.normalized(encoding)).collect();

    let list = TierRanker::new().rank(games, RankingContext::new(group_size));

    let items: PyResult<Vec<PyObject>> = list.games.iter().map(|g| ranked_game_to_py(py, g)).collect();
    Ok(items?.into_py(py))
}

/// Order a JSON array of friends for the picker, returning their Steam IDs
#[pyfunction]
fn sort_friends(friends_json: &str) -> PyResult<Vec<u64>> {
    let mut users: Vec<SteamUser> = serde_json::from_str(friends_json).map_err(value_error)?;
    retain_displayable(&mut users);
    order_friends(&mut users);
    Ok(users.into_iter().map(|u| u.steam_id).collect())
}

/// Python module
#[pymodule]
fn coplay_engine(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rank_games, m)?)?;
    m.add_function(wrap_pyfunction!(sort_friends, m)?)?;
    m.add("__version__", crate::VERSION)?;
    Ok(())
}
