use ratatui::style::{Color, Modifier, Style};

/// Styles used across the browser panes.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub header: Style,
    pub row_highlight: Style,
    pub prompt: Style,
    pub muted: Style,
    pub active: Style,
    pub matched: Style,
    pub error: Style,
    pub success: Style,
    pub border_focused: Style,
}

impl Theme {
    #[must_use]
    pub fn header_style(&self) -> Style {
        self.header
    }

    #[must_use]
    pub fn row_highlight_style(&self) -> Style {
        self.row_highlight
    }

    #[must_use]
    pub fn prompt_style(&self) -> Style {
        self.prompt
    }

    #[must_use]
    pub fn muted_style(&self) -> Style {
        self.muted
    }

    /// Node marked after a navigation.
    #[must_use]
    pub fn active_style(&self) -> Style {
        self.active
    }

    #[must_use]
    pub fn matched_style(&self) -> Style {
        self.matched
    }

    #[must_use]
    pub fn error_style(&self) -> Style {
        self.error
    }

    #[must_use]
    pub fn success_style(&self) -> Style {
        self.success
    }

    #[must_use]
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.muted
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Style::new()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            row_highlight: Style::new().bg(Color::DarkGray),
            prompt: Style::new().fg(Color::Cyan),
            muted: Style::new().fg(Color::Gray),
            active: Style::new()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            matched: Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            error: Style::new().fg(Color::Red),
            success: Style::new().fg(Color::Green),
            border_focused: Style::new().fg(Color::Cyan),
        }
    }
}
