#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod runner;

pub use quiz_core::Clock;

pub use controller::{MIN_PASSWORD_LEN, Screen, SessionController};
pub use error::{AuthFlowError, RunnerError};
pub use runner::{AnswerFeedback, QuizRunner};
