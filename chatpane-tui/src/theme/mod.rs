mod colors;
mod palettes;

pub use colors::{hex_to_color, ColorPalette};
pub use palettes::PaletteTheme;

use ratatui::style::Color;

pub trait Theme: Send + Sync {
    fn name(&self) -> &'static str;

    fn background(&self) -> Color;
    fn foreground(&self) -> Color;
    fn foreground_dim(&self) -> Color;

    fn surface(&self) -> Color;
    fn border(&self) -> Color;

    /// Rows typed by the local user.
    fn accent(&self) -> Color;
    /// Rows from the business side.
    fn accent_secondary(&self) -> Color;

    fn success(&self) -> Color;
    fn warning(&self) -> Color;
    fn error(&self) -> Color;
}

pub struct ThemeManager {
    themes: Vec<Box<dyn Theme>>,
    current_index: usize,
}

impl ThemeManager {
    pub fn new() -> Self {
        let themes: Vec<Box<dyn Theme>> = vec![
            Box::new(PaletteTheme::tokyo_night()),
            Box::new(PaletteTheme::catppuccin_mocha()),
            Box::new(PaletteTheme::dracula()),
            Box::new(PaletteTheme::nord()),
            Box::new(PaletteTheme::gruvbox_dark()),
        ];

        Self {
            themes,
            current_index: 0,
        }
    }

    /// Starts on `name`, falling back to the first theme when it is unknown.
    pub fn with_theme(name: &str) -> Self {
        let mut manager = Self::new();
        if !manager.set_theme_by_name(name) {
            tracing::warn!(
                "Theme '{}' not found, using default '{}'",
                name,
                manager.current_theme_name()
            );
        }
        manager
    }

    pub fn current_theme(&self) -> &dyn Theme {
        self.themes[self.current_index].as_ref()
    }

    pub fn cycle_theme(&mut self) {
        self.current_index = (self.current_index + 1) % self.themes.len();
    }

    pub fn set_theme_by_name(&mut self, name: &str) -> bool {
        if let Some(index) = self
            .themes
            .iter()
            .position(|t| t.name().eq_ignore_ascii_case(name.trim()))
        {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    pub fn available_themes(&self) -> Vec<&'static str> {
        self.themes.iter().map(|t| t.name()).collect()
    }

    pub fn current_theme_name(&self) -> &'static str {
        self.current_theme().name()
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}
