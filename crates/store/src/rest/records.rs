//! Wire shapes for the hosted store's rows.
//!
//! Records mirror the remote columns so the client can serialize and
//! deserialize without leaking transport concerns into the domain layer. The
//! stored `current_level` column is never trusted on read; the level is
//! rederived from the score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use quiz_core::model::{
    Competency, CompetencyError, CompetencyIcon, CompetencyId, PatternCell, Profile, ProfileError,
    ProgressEntry, Question, QuestionError, QuestionId, QuestionKind, UserId, VisualAid,
};

//
// ─── PROFILES ──────────────────────────────────────────────────────────────────
//

/// A `profiles` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub username: Option<String>,
    pub total_score: i64,
    pub current_level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id().value(),
            username: profile.display_name().map(str::to_owned),
            total_score: i64::from(profile.total_score()),
            current_level: i64::from(profile.level()),
            created_at: profile.created_at(),
            updated_at: profile.updated_at(),
        }
    }

    /// Convert the row back into a domain profile.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the timestamps are inconsistent.
    pub fn into_profile(self) -> Result<Profile, ProfileError> {
        let score = u32::try_from(self.total_score).unwrap_or(0);
        Profile::from_persisted(
            UserId::new(self.id),
            self.username,
            score,
            self.created_at,
            self.updated_at,
        )
    }
}

/// Partial update written on competency completion: score, derived level,
/// and the update timestamp, nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct ScorePatch {
    pub total_score: i64,
    pub current_level: i64,
    pub updated_at: DateTime<Utc>,
}

impl ScorePatch {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            total_score: i64::from(profile.total_score()),
            current_level: i64::from(profile.level()),
            updated_at: profile.updated_at(),
        }
    }
}

//
// ─── COMPETENCIES ──────────────────────────────────────────────────────────────
//

/// A `competencies` row.
#[derive(Debug, Clone, Deserialize)]
pub struct CompetencyRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub color: String,
}

impl CompetencyRecord {
    /// Convert the row into a domain competency. Unknown icon identifiers
    /// fall back inside `CompetencyIcon::from_identifier`.
    ///
    /// # Errors
    ///
    /// Returns `CompetencyError` for a blank name or malformed color token.
    pub fn into_competency(self) -> Result<Competency, CompetencyError> {
        Competency::new(
            CompetencyId::new(self.id),
            self.name,
            self.description,
            CompetencyIcon::from_identifier(&self.icon),
            self.color,
        )
    }
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// A `questions` row. `visual_data` stays raw JSON until the kind is known.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub id: Uuid,
    pub competency_id: Uuid,
    pub level: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub question_text: String,
    #[serde(default)]
    pub visual_data: Value,
    pub options: Vec<String>,
    pub correct_answer: i64,
    #[serde(default)]
    pub explanation: String,
    pub points: i64,
}

impl QuestionRecord {
    /// Convert the row into a domain question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the kind, visual payload, or choice
    /// indices fail validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let kind = QuestionKind::from_identifier(&self.kind)?;
        let visual = parse_visual(kind, &self.visual_data)?;
        let correct = usize::try_from(self.correct_answer).unwrap_or(usize::MAX);

        Question::new(
            QuestionId::new(self.id),
            CompetencyId::new(self.competency_id),
            u32::try_from(self.level).unwrap_or(0),
            kind,
            self.question_text,
            visual,
            self.options,
            correct,
            self.explanation,
            u32::try_from(self.points).unwrap_or(0),
        )
    }
}

fn parse_visual(kind: QuestionKind, data: &Value) -> Result<Option<VisualAid>, QuestionError> {
    match kind {
        QuestionKind::Pattern => {
            let Some(shapes) = data.get("pattern").and_then(Value::as_array) else {
                return Ok(None);
            };
            let colors: Vec<&str> = data
                .get("colors")
                .and_then(Value::as_array)
                .map(|array| {
                    array
                        .iter()
                        .map(|value| value.as_str().unwrap_or(""))
                        .collect()
                })
                .unwrap_or_default();

            let mut cells = Vec::with_capacity(shapes.len());
            for (idx, shape) in shapes.iter().enumerate() {
                let shape = shape.as_str().unwrap_or("");
                let color = colors.get(idx).copied().unwrap_or("");
                cells.push(PatternCell::from_identifiers(shape, color)?);
            }
            Ok(Some(VisualAid::Pattern(cells)))
        }
        QuestionKind::Sequence => {
            let Some(numbers) = data.get("sequence").and_then(Value::as_array) else {
                return Ok(None);
            };
            Ok(Some(VisualAid::Sequence(
                numbers.iter().filter_map(Value::as_i64).collect(),
            )))
        }
        QuestionKind::Analogy | QuestionKind::Logic => Ok(None),
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Insert shape for a `user_progress` row.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressRecord {
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub is_correct: bool,
    pub attempts: i64,
    pub completed_at: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_entry(entry: &ProgressEntry) -> Self {
        Self {
            user_id: entry.user_id.value(),
            question_id: entry.question_id.value(),
            is_correct: entry.is_correct,
            attempts: i64::from(entry.attempts),
            completed_at: entry.completed_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
