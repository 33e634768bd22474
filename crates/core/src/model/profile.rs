use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;

/// Level tier for a total score.
///
/// Levels start at 1 and advance every 100 points. The level is never stored
/// as independent truth; every consumer recomputes it from the score.
#[must_use]
pub fn level_for_score(score: u32) -> u32 {
    score / 100 + 1
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("updated_at is before created_at")]
    InvalidTimeRange,
}

/// A user's durable profile: display name plus accumulated score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: UserId,
    display_name: Option<String>,
    total_score: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile for a newly registered user, starting at score 0.
    #[must_use]
    pub fn new(id: UserId, display_name: Option<String>, created_at: DateTime<Utc>) -> Self {
        let display_name = display_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        Self {
            id,
            display_name,
            total_score: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rehydrate a profile from a persisted row.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidTimeRange` if `updated_at` predates
    /// `created_at`.
    pub fn from_persisted(
        id: UserId,
        display_name: Option<String>,
        total_score: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ProfileError> {
        if updated_at < created_at {
            return Err(ProfileError::InvalidTimeRange);
        }

        let display_name = display_name.filter(|name| !name.trim().is_empty());

        Ok(Self {
            id,
            display_name,
            total_score,
            created_at,
            updated_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Current level, recomputed from the score on every read.
    #[must_use]
    pub fn level(&self) -> u32 {
        level_for_score(self.total_score)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Snapshot with `points` added to the total score.
    ///
    /// Scores only ever grow; nothing subtracts points.
    #[must_use]
    pub fn with_points(&self, points: u32, at: DateTime<Utc>) -> Self {
        Self {
            total_score: self.total_score.saturating_add(points),
            updated_at: at,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use uuid::Uuid;

    fn user() -> UserId {
        UserId::new(Uuid::from_u128(7))
    }

    #[test]
    fn level_advances_every_hundred_points() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(99), 1);
        assert_eq!(level_for_score(100), 2);
        assert_eq!(level_for_score(250), 3);
    }

    #[test]
    fn new_profile_starts_at_level_one() {
        let profile = Profile::new(user(), Some("Ada".into()), fixed_now());
        assert_eq!(profile.total_score(), 0);
        assert_eq!(profile.level(), 1);
        assert_eq!(profile.display_name(), Some("Ada"));
    }

    #[test]
    fn blank_display_name_becomes_none() {
        let profile = Profile::new(user(), Some("   ".into()), fixed_now());
        assert_eq!(profile.display_name(), None);
    }

    #[test]
    fn with_points_accumulates_and_rederives_level() {
        let now = fixed_now();
        let profile = Profile::new(user(), None, now);
        let later = now + chrono::Duration::minutes(5);

        let updated = profile.with_points(85, later).with_points(40, later);

        assert_eq!(updated.total_score(), 125);
        assert_eq!(updated.level(), 2);
        assert_eq!(updated.updated_at(), later);
        assert_eq!(updated.created_at(), now);
    }

    #[test]
    fn from_persisted_rejects_reversed_timestamps() {
        let now = fixed_now();
        let err = Profile::from_persisted(user(), None, 10, now, now - chrono::Duration::hours(1))
            .unwrap_err();
        assert_eq!(err, ProfileError::InvalidTimeRange);
    }
}
