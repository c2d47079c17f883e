//! Colour palette for terminal output.

use owo_colors::Style;

/// Named styles. All plain until [`Styles::enable`] is called.
#[derive(Default, Clone)]
pub struct Styles {
    pub ok: Style,
    pub caution: Style,
    pub failure: Style,
    pub note: Style,
    pub muted: Style,
    pub title: Style,
    pub path: Style,
}

impl Styles {
    /// Switch every style to its coloured form.
    pub fn enable(&mut self) {
        self.ok = Style::new().green();
        self.caution = Style::new().yellow();
        self.failure = Style::new().red().bold();
        self.note = Style::new().blue();
        self.muted = Style::new().dimmed();
        self.title = Style::new().bold().cyan();
        self.path = Style::new().underline();
    }

    /// Style for a systemd `is-active` / `is-enabled` answer.
    #[must_use]
    pub fn for_state(&self, state: &str) -> Style {
        match state {
            "active" | "enabled" | "enabled-runtime" | "static" => self.ok,
            "activating" | "deactivating" | "reloading" | "inactive" | "disabled" => self.caution,
            "failed" | "masked" => self.failure,
            _ => self.muted,
        }
    }
}
