mod menu_vm;
mod presenter;
mod results_vm;

pub use menu_vm::{CompetencyCardVm, map_competency_card};
pub use presenter::{AdvanceTicket, FEEDBACK_SECS, PresenterPhase, QuestionPresenter};
pub use results_vm::{ResultsVm, map_results};
