use ratatui::style::Color;

/// Picker palette.
#[derive(Clone)]
pub struct Theme {
    pub bg: Color,

    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    pub accent: Color,
    pub highlight: Color,

    pub success: Color,
    pub warning: Color,

    pub border: Color,
    pub border_focused: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            bg: Color::Reset,
            fg_primary: Color::Rgb(10, 15, 20),
            fg_secondary: Color::Rgb(26, 45, 66),
            fg_muted: Color::Rgb(90, 105, 120),
            accent: Color::Rgb(30, 69, 112),
            highlight: Color::Rgb(153, 101, 21),
            success: Color::Rgb(13, 94, 58),
            warning: Color::Rgb(153, 101, 21),
            border: Color::Rgb(184, 212, 241),
            border_focused: Color::Rgb(46, 90, 144),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg_primary: Color::Rgb(245, 250, 255),
            fg_secondary: Color::Rgb(200, 220, 240),
            fg_muted: Color::Rgb(80, 100, 120),
            accent: Color::Rgb(100, 200, 255),
            highlight: Color::Rgb(255, 215, 95),
            success: Color::Rgb(80, 250, 150),
            warning: Color::Rgb(255, 215, 95),
            border: Color::Rgb(60, 90, 120),
            border_focused: Color::Rgb(100, 200, 255),
        }
    }

    /// Pick light or dark from `COLORFGBG` (set by most terminals); dark otherwise.
    pub fn detect() -> Self {
        let light = std::env::var("COLORFGBG")
            .ok()
            .is_some_and(|value| is_light_background(&value));
        if light {
            Self::light()
        } else {
            Self::dark()
        }
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); 7 and 15 are light backgrounds.
fn is_light_background(colorfgbg: &str) -> bool {
    matches!(colorfgbg.rsplit(';').next().map(str::trim), Some("7" | "15"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorfgbg_background_detection() {
        assert!(is_light_background("0;15"));
        assert!(is_light_background("0;default;7"));
        assert!(!is_light_background("15;0"));
        assert!(!is_light_background(""));
    }
}
