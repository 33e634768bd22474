use thiserror::Error;

use crate::model::ids::{CompetencyId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while validating question reference data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least one answer choice")]
    NoChoices,

    #[error("correct choice index {index} out of range for {len} choices")]
    CorrectChoiceOutOfRange { index: usize, len: usize },

    #[error("unknown question kind: {0}")]
    UnknownKind(String),

    #[error("unknown pattern shape: {0}")]
    UnknownShape(String),
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// The reasoning style a question exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Visual shape/color pattern with a blank slot to fill.
    Pattern,
    /// Numeric sequence with an implicit trailing unknown.
    Sequence,
    /// Verbal analogy.
    Analogy,
    /// Plain logic puzzle.
    Logic,
}

impl QuestionKind {
    /// Maps a stored identifier onto a kind.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownKind` for anything outside the set.
    pub fn from_identifier(raw: &str) -> Result<Self, QuestionError> {
        match raw {
            "pattern" => Ok(Self::Pattern),
            "sequence" => Ok(Self::Sequence),
            "analogy" => Ok(Self::Analogy),
            "logic" => Ok(Self::Logic),
            other => Err(QuestionError::UnknownKind(other.to_owned())),
        }
    }

    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Sequence => "sequence",
            Self::Analogy => "analogy",
            Self::Logic => "logic",
        }
    }
}

//
// ─── VISUAL PAYLOAD ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

impl Shape {
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeColor {
    Blue,
    Red,
    Green,
    Yellow,
}

impl ShapeColor {
    /// Maps a stored color name, falling back to `Blue` for unknown values.
    #[must_use]
    pub fn from_identifier(raw: &str) -> Self {
        match raw {
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            _ => Self::Blue,
        }
    }

    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
        }
    }
}

/// One slot in a pattern strip: either a colored shape or the blank the user
/// is asked to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCell {
    Glyph { shape: Shape, color: ShapeColor },
    Blank,
}

impl PatternCell {
    /// Builds a cell from stored shape/color identifiers. The shape `"?"`
    /// marks the blank slot.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownShape` for unrecognized shapes.
    pub fn from_identifiers(shape: &str, color: &str) -> Result<Self, QuestionError> {
        match shape {
            "?" => Ok(Self::Blank),
            "circle" => Ok(Self::Glyph {
                shape: Shape::Circle,
                color: ShapeColor::from_identifier(color),
            }),
            "square" => Ok(Self::Glyph {
                shape: Shape::Square,
                color: ShapeColor::from_identifier(color),
            }),
            "triangle" => Ok(Self::Glyph {
                shape: Shape::Triangle,
                color: ShapeColor::from_identifier(color),
            }),
            other => Err(QuestionError::UnknownShape(other.to_owned())),
        }
    }
}

/// Kind-dependent visual aid rendered above the answer choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualAid {
    /// Ordered shape strip; blanks render as unfilled slots.
    Pattern(Vec<PatternCell>),
    /// Ordered numeric run; the next value is the implicit unknown.
    Sequence(Vec<i64>),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Immutable reference data for one question.
///
/// Fetched per competency, ordered by ascending difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    competency_id: CompetencyId,
    difficulty: u32,
    kind: QuestionKind,
    prompt: String,
    visual: Option<VisualAid>,
    choices: Vec<String>,
    correct_choice: usize,
    explanation: String,
    points: u32,
}

impl Question {
    /// Creates a new Question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::NoChoices` when no answer choices exist, or
    /// `QuestionError::CorrectChoiceOutOfRange` when the correct index does
    /// not address a choice.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        competency_id: CompetencyId,
        difficulty: u32,
        kind: QuestionKind,
        prompt: impl Into<String>,
        visual: Option<VisualAid>,
        choices: Vec<String>,
        correct_choice: usize,
        explanation: impl Into<String>,
        points: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if choices.is_empty() {
            return Err(QuestionError::NoChoices);
        }
        if correct_choice >= choices.len() {
            return Err(QuestionError::CorrectChoiceOutOfRange {
                index: correct_choice,
                len: choices.len(),
            });
        }

        Ok(Self {
            id,
            competency_id,
            difficulty,
            kind,
            prompt: prompt.trim().to_owned(),
            visual,
            choices,
            correct_choice,
            explanation: explanation.into(),
            points,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn competency_id(&self) -> CompetencyId {
        self.competency_id
    }

    #[must_use]
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn visual(&self) -> Option<&VisualAid> {
        self.visual.as_ref()
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_choice(&self) -> usize {
        self.correct_choice
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Whether `choice` addresses the correct answer.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_choice
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn build(choices: Vec<String>, correct: usize) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new(Uuid::from_u128(1)),
            CompetencyId::new(Uuid::from_u128(2)),
            1,
            QuestionKind::Logic,
            "Which conclusion follows?",
            None,
            choices,
            correct,
            "Only the second option is entailed.",
            10,
        )
    }

    #[test]
    fn rejects_empty_choice_list() {
        let err = build(Vec::new(), 0).unwrap_err();
        assert_eq!(err, QuestionError::NoChoices);
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = build(vec!["a".into(), "b".into()], 2).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectChoiceOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn grades_choices_against_correct_index() {
        let question = build(vec!["a".into(), "b".into(), "c".into()], 1).unwrap();
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
        assert!(!question.is_correct(2));
    }

    #[test]
    fn kind_identifier_roundtrips() {
        for kind in [
            QuestionKind::Pattern,
            QuestionKind::Sequence,
            QuestionKind::Analogy,
            QuestionKind::Logic,
        ] {
            assert_eq!(
                QuestionKind::from_identifier(kind.identifier()).unwrap(),
                kind
            );
        }
        assert!(matches!(
            QuestionKind::from_identifier("riddle"),
            Err(QuestionError::UnknownKind(_))
        ));
    }

    #[test]
    fn pattern_cell_parses_blank_and_shapes() {
        assert_eq!(
            PatternCell::from_identifiers("?", "").unwrap(),
            PatternCell::Blank
        );
        assert_eq!(
            PatternCell::from_identifiers("circle", "red").unwrap(),
            PatternCell::Glyph {
                shape: Shape::Circle,
                color: ShapeColor::Red,
            }
        );
        // Unknown colors degrade to blue instead of failing the row.
        assert_eq!(
            PatternCell::from_identifiers("square", "mauve").unwrap(),
            PatternCell::Glyph {
                shape: Shape::Square,
                color: ShapeColor::Blue,
            }
        );
        assert!(matches!(
            PatternCell::from_identifiers("hexagon", "blue"),
            Err(QuestionError::UnknownShape(_))
        ));
    }
}
