#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    AuthClient, AuthError, CompetencyRepository, Identity, InMemoryStore, ProfileRepository,
    ProgressRepository, QuestionRepository, Store, StoreError,
};
pub use rest::{RestConfig, RestStore};
