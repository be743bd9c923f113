mod account;
mod catalog;
mod preferences;
mod watchlist;

pub use account::{cmd_login, cmd_logout, cmd_signup, cmd_whoami};
pub use catalog::{cmd_info, cmd_random, cmd_recommend, cmd_search, cmd_trending};
pub use preferences::{
    cmd_avatar_set, cmd_avatar_show, cmd_theme_set, cmd_theme_show, cmd_theme_toggle,
};
pub use watchlist::{
    cmd_watchlist_add, cmd_watchlist_clear, cmd_watchlist_count, cmd_watchlist_list,
    cmd_watchlist_remove, cmd_watchlist_toggle,
};
