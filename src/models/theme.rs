use serde::Serialize;

/// Color palette derived from the dark-mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub is_dark_mode: bool,
    pub background: &'static str,
    pub card: &'static str,
    pub text: &'static str,
    pub secondary_text: &'static str,
    pub stat_text: &'static str,
    pub border: &'static str,
    pub gradient: [&'static str; 2],
    pub primary: &'static str,
    pub accent: &'static str,
}

impl Theme {
    pub const LIGHT: Self = Self {
        is_dark_mode: false,
        background: "#f5f5f5",
        card: "#ffffff",
        text: "#121212",
        secondary_text: "#6e6e6e",
        stat_text: "#505050",
        border: "rgba(0,0,0,0.1)",
        gradient: ["#f0f2f5", "#e0e3e8"],
        primary: "#5e72e4",
        accent: "#ff3867",
    };

    pub const DARK: Self = Self {
        is_dark_mode: true,
        background: "#1e2246",
        card: "#2d325a",
        text: "#ffffff",
        secondary_text: "#a0a0cc",
        stat_text: "#d0d0e0",
        border: "rgba(255,255,255,0.1)",
        gradient: ["#192045", "#0f1535"],
        primary: "#5e72e4",
        accent: "#ff3867",
    };

    #[must_use]
    pub const fn for_mode(dark: bool) -> Self {
        if dark { Self::DARK } else { Self::LIGHT }
    }
}
