use ratatui::style::Color;

use super::{colors::ColorPalette, Theme};

/// A theme defined entirely by a named palette.
pub struct PaletteTheme {
    name: &'static str,
    palette: ColorPalette,
}

impl PaletteTheme {
    pub fn new(name: &'static str, palette: ColorPalette) -> Self {
        Self { name, palette }
    }

    pub fn tokyo_night() -> Self {
        Self::new(
            "Tokyo Night",
            ColorPalette::from_hex(
                0x1a1b26, 0xc0caf5, 0x565f89, 0x24283b, 0x414868, 0x7aa2f7, 0xbb9af7, 0x9ece6a,
                0xe0af68, 0xf7768e,
            ),
        )
    }

    pub fn catppuccin_mocha() -> Self {
        Self::new(
            "Catppuccin Mocha",
            ColorPalette::from_hex(
                0x1e1e2e, 0xcdd6f4, 0x6c7086, 0x313244, 0x45475a, 0xcba6f7, 0xf5c2e7, 0xa6e3a1,
                0xf9e2af, 0xf38ba8,
            ),
        )
    }

    pub fn dracula() -> Self {
        Self::new(
            "Dracula",
            ColorPalette::from_hex(
                0x282a36, 0xf8f8f2, 0x6272a4, 0x44475a, 0x6272a4, 0xbd93f9, 0xff79c6, 0x50fa7b,
                0xf1fa8c, 0xff5555,
            ),
        )
    }

    pub fn nord() -> Self {
        Self::new(
            "Nord",
            ColorPalette::from_hex(
                0x2e3440, 0xeceff4, 0x4c566a, 0x3b4252, 0x4c566a, 0x88c0d0, 0x81a1c1, 0xa3be8c,
                0xebcb8b, 0xbf616a,
            ),
        )
    }

    pub fn gruvbox_dark() -> Self {
        Self::new(
            "Gruvbox Dark",
            ColorPalette::from_hex(
                0x282828, 0xebdbb2, 0x928374, 0x3c3836, 0x504945, 0xfe8019, 0xd3869b, 0xb8bb26,
                0xfabd2f, 0xfb4934,
            ),
        )
    }
}

impl Theme for PaletteTheme {
    fn name(&self) -> &'static str {
        self.name
    }

    fn background(&self) -> Color {
        self.palette.background
    }

    fn foreground(&self) -> Color {
        self.palette.foreground
    }

    fn foreground_dim(&self) -> Color {
        self.palette.foreground_dim
    }

    fn surface(&self) -> Color {
        self.palette.surface
    }

    fn border(&self) -> Color {
        self.palette.border
    }

    fn accent(&self) -> Color {
        self.palette.accent
    }

    fn accent_secondary(&self) -> Color {
        self.palette.accent_secondary
    }

    fn success(&self) -> Color {
        self.palette.success
    }

    fn warning(&self) -> Color {
        self.palette.warning
    }

    fn error(&self) -> Color {
        self.palette.error
    }
}
