use quiz_core::model::{Competency, CompetencyId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompetencyCardVm {
    pub id: CompetencyId,
    pub name: String,
    pub description: String,
    pub glyph: &'static str,
    pub color: String,
    pub progress_pct: u8,
}

#[must_use]
pub fn map_competency_card(competency: &Competency) -> CompetencyCardVm {
    CompetencyCardVm {
        id: competency.id(),
        name: competency.name().to_owned(),
        description: competency.description().to_owned(),
        glyph: competency.icon().glyph(),
        color: competency.color().to_owned(),
        progress_pct: placeholder_progress(competency.id()),
    }
}

/// Placeholder progress percentage, stable per competency, until real
/// per-user completion tracking exists.
fn placeholder_progress(id: CompetencyId) -> u8 {
    let sum: u32 = id
        .value()
        .as_bytes()
        .iter()
        .map(|byte| u32::from(*byte))
        .sum();
    #[allow(clippy::cast_possible_truncation)]
    let offset = (sum % 60) as u8;
    20 + offset
}
