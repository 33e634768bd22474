mod competency;
mod ids;
mod profile;
mod progress;
mod question;
mod quiz;

pub use ids::{CompetencyId, ParseIdError, QuestionId, UserId};

pub use competency::{Competency, CompetencyError, CompetencyIcon};
pub use profile::{Profile, ProfileError, level_for_score};
pub use progress::ProgressEntry;
pub use question::{
    PatternCell, Question, QuestionError, QuestionKind, Shape, ShapeColor, VisualAid,
};
pub use quiz::{AnswerOutcome, QuizError, QuizProgress, QuizSession, QuizTally};
