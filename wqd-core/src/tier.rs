//! Badge kind → visual severity tier, and the gauge policy.
//!
//! Styling is returned as inline style strings so every component carries
//! its own colors; nothing is injected into a global stylesheet.

use crate::model::{BadgeKind, Decision, Severity};
use serde::Serialize;

/// Visual severity tier used to color badges, banners and the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Safe,
    Warning,
    Danger,
    Neutral,
}

impl From<BadgeKind> for Tier {
    fn from(kind: BadgeKind) -> Self {
        match kind {
            BadgeKind::Optimal | BadgeKind::Good | BadgeKind::Normal | BadgeKind::Safe => {
                Tier::Safe
            }
            BadgeKind::Low | BadgeKind::Warning => Tier::Warning,
            BadgeKind::High | BadgeKind::Danger => Tier::Danger,
            BadgeKind::Unknown => Tier::Neutral,
        }
    }
}

impl From<Severity> for Tier {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Safe => Tier::Safe,
            Severity::Warning => Tier::Warning,
            Severity::Danger => Tier::Danger,
        }
    }
}

impl Tier {
    /// Tinted background for badges and banners.
    pub fn background(&self) -> &'static str {
        match self {
            Tier::Safe => "#DCFCE7",
            Tier::Warning => "#FEF3C7",
            Tier::Danger => "#FEE2E2",
            Tier::Neutral => "#F3F4F6",
        }
    }

    /// Foreground text color.
    pub fn foreground(&self) -> &'static str {
        match self {
            Tier::Safe => "#15803D",
            Tier::Warning => "#B45309",
            Tier::Danger => "#B91C1C",
            Tier::Neutral => "#4B5563",
        }
    }

    /// Saturated accent for gauge arcs and banner borders.
    pub fn accent(&self) -> &'static str {
        match self {
            Tier::Safe => "#22C55E",
            Tier::Warning => "#F59E0B",
            Tier::Danger => "#EF4444",
            Tier::Neutral => "#9CA3AF",
        }
    }

    /// Inline style for a pill-shaped parameter badge.
    pub fn badge_style(&self) -> String {
        format!(
            "display: inline-block; margin-top: 8px; padding: 2px 8px; font-size: 12px; border-radius: 9999px; background: {}; color: {};",
            self.background(),
            self.foreground()
        )
    }

    /// Single-character marker for terminal output.
    pub fn symbol(&self) -> &'static str {
        match self {
            Tier::Safe => "✓",
            Tier::Warning => "!",
            Tier::Danger => "✗",
            Tier::Neutral => "·",
        }
    }

    /// ANSI SGR color code for terminal output.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            Tier::Safe => "32",
            Tier::Warning => "33",
            Tier::Danger => "31",
            Tier::Neutral => "90",
        }
    }

    /// Wrap `text` in this tier's terminal color.
    pub fn paint(&self, text: &str) -> String {
        format!("\x1b[{}m{}\x1b[0m", self.ansi_code(), text)
    }
}

/// Gauge fill (0–100) for the current decision.
///
/// safe → 100, warning → 50, danger or no decision → 0.
pub fn gauge_value(decision: Option<&Decision>) -> u8 {
    match decision.map(|d| d.severity) {
        Some(Severity::Safe) => 100,
        Some(Severity::Warning) => 50,
        Some(Severity::Danger) | None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(severity: Severity) -> Decision {
        Decision {
            potable: severity == Severity::Safe,
            severity,
            reasons: Vec::new(),
            recommendations: Vec::new(),
            alternative_use: Vec::new(),
        }
    }

    #[test]
    fn safe_kinds_map_to_safe_tier() {
        for kind in [BadgeKind::Optimal, BadgeKind::Good, BadgeKind::Normal, BadgeKind::Safe] {
            assert_eq!(Tier::from(kind), Tier::Safe);
        }
    }

    #[test]
    fn warning_and_danger_kinds() {
        assert_eq!(Tier::from(BadgeKind::Low), Tier::Warning);
        assert_eq!(Tier::from(BadgeKind::Warning), Tier::Warning);
        assert_eq!(Tier::from(BadgeKind::High), Tier::Danger);
        assert_eq!(Tier::from(BadgeKind::Danger), Tier::Danger);
        assert_eq!(Tier::from(BadgeKind::Unknown), Tier::Neutral);
    }

    #[test]
    fn gauge_follows_severity() {
        assert_eq!(gauge_value(Some(&decision(Severity::Safe))), 100);
        assert_eq!(gauge_value(Some(&decision(Severity::Warning))), 50);
        assert_eq!(gauge_value(Some(&decision(Severity::Danger))), 0);
        assert_eq!(gauge_value(None), 0);
    }

    #[test]
    fn badge_style_uses_tier_colors() {
        let style = Tier::Danger.badge_style();
        assert!(style.contains("#FEE2E2"));
        assert!(style.contains("#B91C1C"));
    }

    #[test]
    fn paint_wraps_in_tier_color() {
        assert_eq!(Tier::Danger.paint("x"), "\x1b[31mx\x1b[0m");
        assert_eq!(Tier::Safe.ansi_code(), "32");
    }
}
