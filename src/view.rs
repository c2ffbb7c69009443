use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Session value: the view the browser last looked at.
pub const VIEW: &str = "view";
/// Session value: the chat open in the inbox.
pub const ACTIVE_CHAT_ID: &str = "active_chat_id";

/// The main screens of the authenticated app. Only one is shown at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Discover,
    Reels,
    Inbox,
    Profile,
}

impl View {
    pub const ALL: [View; 4] = [View::Discover, View::Reels, View::Inbox, View::Profile];

    pub fn path(&self) -> &'static str {
        match self {
            View::Discover => "/p",
            View::Reels => "/p/reels",
            View::Inbox => "/c",
            View::Profile => "/me",
        }
    }

    /// Navigation links, with `self` marked as current.
    pub fn nav(&self) -> String {
        View::ALL
            .iter()
            .map(|view| {
                let class = if view == self { " class=\"current\"" } else { "" };
                format!("<a href=\"{}\"{class}>{view}</a>", view.path())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown view {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("inbox".parse::<View>(), Ok(View::Inbox));
        assert_eq!("Reels".parse::<View>(), Ok(View::Reels));
        assert!("Settings".parse::<View>().is_err());
    }

    #[test]
    fn nav_marks_current_view() {
        let nav = View::Profile.nav();
        assert!(nav.contains("<a href=\"/me\" class=\"current\">Profile</a>"));
        assert!(nav.contains("<a href=\"/p\">Discover</a>"));
    }
}
