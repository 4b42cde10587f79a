//! Theme system for the portal UI.
//!
//! Provides:
//! - Theme struct with all UI colors
//! - Built-in presets (slate, paper, nord)
//! - Lookup by config name with fallback

use ratatui::style::Color;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Background for the selected table row / focused field
    pub selection_bg: Color,
    /// Text color for selected items
    pub selection_fg: Color,
    /// Accent color (borders, active tab, sort indicator)
    pub accent: Color,
    /// Dimmed text (hints, secondary info)
    pub dimmed: Color,
    /// More dimmed text (disabled navigation, placeholders)
    pub dimmed_alt: Color,
    /// Success toasts and "accepted" badges
    pub success: Color,
    /// Error toasts, form errors, "cancelled" badges
    pub error: Color,
    /// Pending states ("draft", "under review", open tickets)
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    /// Slate theme - default, dark blue-grey with a blue accent
    pub fn slate() -> Self {
        Self {
            background: Color::Rgb(15, 20, 30),       // #0f141e
            foreground: Color::Rgb(226, 232, 240),    // #e2e8f0
            selection_bg: Color::Rgb(30, 41, 59),     // #1e293b
            selection_fg: Color::Rgb(226, 232, 240),  // #e2e8f0
            accent: Color::Rgb(59, 130, 246),         // #3b82f6 (blue)
            dimmed: Color::Rgb(148, 163, 184),        // #94a3b8
            dimmed_alt: Color::Rgb(100, 116, 139),    // #64748b
            success: Color::Rgb(34, 197, 94),         // #22c55e
            error: Color::Rgb(239, 68, 68),           // #ef4444
            warning: Color::Rgb(234, 179, 8),         // #eab308
        }
    }

    /// Paper theme (light)
    pub fn paper() -> Self {
        Self {
            background: Color::Rgb(249, 250, 251),    // #f9fafb
            foreground: Color::Rgb(17, 24, 39),       // #111827
            selection_bg: Color::Rgb(219, 234, 254),  // #dbeafe
            selection_fg: Color::Rgb(17, 24, 39),     // #111827
            accent: Color::Rgb(37, 99, 235),          // #2563eb (blue)
            dimmed: Color::Rgb(107, 114, 128),        // #6b7280
            dimmed_alt: Color::Rgb(156, 163, 175),    // #9ca3af
            success: Color::Rgb(22, 163, 74),         // #16a34a
            error: Color::Rgb(220, 38, 38),           // #dc2626
            warning: Color::Rgb(202, 138, 4),         // #ca8a04
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),       // #2e3440 (nord0)
            foreground: Color::Rgb(236, 239, 244),    // #eceff4 (nord6)
            selection_bg: Color::Rgb(67, 76, 94),     // #434c5e (nord2)
            selection_fg: Color::Rgb(236, 239, 244),  // #eceff4 (nord6)
            accent: Color::Rgb(136, 192, 208),        // #88c0d0 (nord8)
            dimmed: Color::Rgb(216, 222, 233),        // #d8dee9 (nord4)
            dimmed_alt: Color::Rgb(76, 86, 106),      // #4c566a (nord3)
            success: Color::Rgb(163, 190, 140),       // #a3be8c (nord14)
            error: Color::Rgb(191, 97, 106),          // #bf616a (nord11)
            warning: Color::Rgb(235, 203, 139),       // #ebcb8b (nord13)
        }
    }

    /// Resolve a preset by config name, falling back to the default.
    pub fn by_name(name: &str) -> Self {
        match name {
            "slate" => Self::slate(),
            "paper" => Self::paper(),
            "nord" => Self::nord(),
            other => {
                tracing::warn!("Unknown theme '{other}', using slate");
                Self::slate()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_default() {
        let theme = Theme::by_name("does-not-exist");
        assert_eq!(theme.accent, Theme::slate().accent);
    }
}
