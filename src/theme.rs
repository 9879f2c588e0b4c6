use catppuccin::PALETTE;
use ratatui::style::Color;
use tracing::warn;

const fn rgb(color: &catppuccin::Color) -> Color {
    Color::Rgb(color.rgb.r, color.rgb.g, color.rgb.b)
}

/// Application color palette.
///
/// Holds plain color values, so a theme is independent of where its colors
/// came from. The built-in themes map the Catppuccin flavors.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub mantle: Color,

    pub surface0: Color,
    pub surface1: Color,

    pub overlay0: Color,

    pub text: Color,
    pub subtext0: Color,
    pub subtext1: Color,

    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub sky: Color,
    pub blue: Color,
    pub lavender: Color,
}

impl Theme {
    const fn from_flavor(flavor: &catppuccin::Flavor) -> Self {
        let colors = &flavor.colors;
        Self {
            base: rgb(&colors.base),
            mantle: rgb(&colors.mantle),
            surface0: rgb(&colors.surface0),
            surface1: rgb(&colors.surface1),
            overlay0: rgb(&colors.overlay0),
            text: rgb(&colors.text),
            subtext0: rgb(&colors.subtext0),
            subtext1: rgb(&colors.subtext1),
            mauve: rgb(&colors.mauve),
            red: rgb(&colors.red),
            peach: rgb(&colors.peach),
            yellow: rgb(&colors.yellow),
            green: rgb(&colors.green),
            sky: rgb(&colors.sky),
            blue: rgb(&colors.blue),
            lavender: rgb(&colors.lavender),
        }
    }

    // Outcome colors

    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn warning(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn error(&self) -> Color {
        self.red
    }

    // Widget chrome

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn border_focused(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn selection_fg(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn highlight(&self) -> Color {
        self.mauve
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_flavor(&PALETTE.mocha)
    }
}

/// Names accepted in the config file and on the command line.
pub const THEME_NAMES: &[&str] = &[
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

/// Look up a theme by name, falling back to the default with a warning.
pub fn theme_from_name(name: &str) -> Theme {
    match name {
        "Catppuccin Mocha" => Theme::from_flavor(&PALETTE.mocha),
        "Catppuccin Macchiato" => Theme::from_flavor(&PALETTE.macchiato),
        "Catppuccin Frappé" | "Catppuccin Frappe" => Theme::from_flavor(&PALETTE.frappe),
        "Catppuccin Latte" => Theme::from_flavor(&PALETTE.latte),
        _ => {
            warn!(
                %name,
                available = %THEME_NAMES.join(", "),
                "unknown theme, using the default"
            );
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in THEME_NAMES {
            // A listed name must not fall back to the default silently; latte
            // is the one light flavor, so its base differs from mocha's.
            let _ = theme_from_name(name);
        }
        assert_ne!(
            theme_from_name("Catppuccin Latte").base,
            Theme::default().base
        );
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        assert_eq!(theme_from_name("solarized").base, Theme::default().base);
    }

    #[test]
    fn frappe_accepts_the_unaccented_spelling() {
        assert_eq!(
            theme_from_name("Catppuccin Frappe").base,
            theme_from_name("Catppuccin Frappé").base
        );
    }
}
