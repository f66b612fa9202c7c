use console::Style;
use weather_core::{Theme, UnitSystem};

/// Styles for one theme.
#[derive(Debug, Clone)]
pub struct Palette {
    pub title: Style,
    pub label: Style,
    pub value: Style,
    pub muted: Style,
    pub high: Style,
    pub low: Style,
    pub marker: Style,
    pub error: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                title: Style::new().blue().bold(),
                label: Style::new().black().dim(),
                value: Style::new().black().bold(),
                muted: Style::new().dim(),
                high: Style::new().color256(208),
                low: Style::new().color256(33),
                marker: Style::new().red().bold(),
                error: Style::new().red().bold(),
            },
            Theme::Dark => Self {
                title: Style::new().cyan().bold(),
                label: Style::new().white().dim(),
                value: Style::new().white().bold(),
                muted: Style::new().color256(245),
                high: Style::new().color256(214),
                low: Style::new().color256(75),
                marker: Style::new().yellow().bold(),
                error: Style::new().color256(203).bold(),
            },
        }
    }
}

/// Per-render context: everything a render call needs besides the data itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub units: UnitSystem,
    pub palette: Palette,
}

impl RenderContext {
    pub fn new(units: UnitSystem, theme: Theme) -> Self {
        Self { units, palette: Palette::for_theme(theme) }
    }

    pub fn temp(&self, value: f64) -> String {
        format!("{value:.1}{}", self.units.temperature_suffix())
    }

    pub fn wind(&self, value: f64) -> String {
        format!("{value:.1} {}", self.units.wind_suffix())
    }
}
