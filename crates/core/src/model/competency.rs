use thiserror::Error;

use crate::model::ids::CompetencyId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompetencyError {
    #[error("competency name cannot be empty")]
    EmptyName,

    #[error("invalid color token: {0}")]
    InvalidColor(String),
}

//
// ─── ICON ──────────────────────────────────────────────────────────────────────
//

/// Closed set of renderable competency icons.
///
/// Remote rows carry a free-form identifier string; anything outside this set
/// falls back to `Brain` rather than failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetencyIcon {
    Target,
    Brain,
    Users,
    MessageCircle,
    TrendingUp,
    Lightbulb,
    Puzzle,
    BarChart,
}

impl CompetencyIcon {
    /// Maps a stored identifier onto the closed icon set.
    #[must_use]
    pub fn from_identifier(raw: &str) -> Self {
        match raw {
            "Target" => Self::Target,
            "Users" => Self::Users,
            "MessageCircle" => Self::MessageCircle,
            "TrendingUp" => Self::TrendingUp,
            "Lightbulb" => Self::Lightbulb,
            "Puzzle" => Self::Puzzle,
            "BarChart" => Self::BarChart,
            _ => Self::Brain,
        }
    }

    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Target => "Target",
            Self::Brain => "Brain",
            Self::Users => "Users",
            Self::MessageCircle => "MessageCircle",
            Self::TrendingUp => "TrendingUp",
            Self::Lightbulb => "Lightbulb",
            Self::Puzzle => "Puzzle",
            Self::BarChart => "BarChart",
        }
    }

    /// Text glyph the desktop UI renders for this icon.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Target => "🎯",
            Self::Brain => "🧠",
            Self::Users => "👥",
            Self::MessageCircle => "💬",
            Self::TrendingUp => "📈",
            Self::Lightbulb => "💡",
            Self::Puzzle => "🧩",
            Self::BarChart => "📊",
        }
    }
}

//
// ─── COMPETENCY ────────────────────────────────────────────────────────────────
//

/// A named professional-skill category grouping questions.
///
/// Immutable reference data, loaded on menu entry and ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competency {
    id: CompetencyId,
    name: String,
    description: String,
    icon: CompetencyIcon,
    color: String,
}

impl Competency {
    /// Creates a new Competency.
    ///
    /// # Errors
    ///
    /// Returns `CompetencyError::EmptyName` if the name is blank, or
    /// `CompetencyError::InvalidColor` if the color token is not `#rrggbb`.
    pub fn new(
        id: CompetencyId,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: CompetencyIcon,
        color: impl Into<String>,
    ) -> Result<Self, CompetencyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CompetencyError::EmptyName);
        }

        let color = color.into();
        if !is_hex_color(&color) {
            return Err(CompetencyError::InvalidColor(color));
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description: description.into().trim().to_owned(),
            icon,
            color,
        })
    }

    #[must_use]
    pub fn id(&self) -> CompetencyId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> CompetencyIcon {
        self.icon
    }

    /// CSS-style `#rrggbb` token used as the accent color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }
}

fn is_hex_color(raw: &str) -> bool {
    let Some(digits) = raw.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
