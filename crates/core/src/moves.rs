//! Move catalog data types. Definitions only, no behavior.

/// Broad move classification.
///
/// The damage formula uses the same attack/defense pair for `Physical`
/// and `Special`, and `Status` moves are not special-cased before damage
/// is applied. Both quirks are faithful to the reference behavior.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MoveCategory {
    #[default]
    Physical,
    Special,
    Status,
}

/// Immutable definition of an attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDef {
    pub name: String,
    pub category: MoveCategory,
    pub power: u32,
    /// Hit chance in percent (0..=100). Declared per move but never
    /// consulted by move resolution: the reference behavior has no miss
    /// chance.
    pub accuracy: u32,
    pub energy_cost: u32,
}

impl MoveDef {
    pub fn new(
        name: impl Into<String>,
        category: MoveCategory,
        power: u32,
        accuracy: u32,
        energy_cost: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            power,
            accuracy,
            energy_cost,
        }
    }
}
