use serde::Serialize;

/// Valid values of a four-point Likert rating (4 is best).
pub const LIKERT_RANGE: std::ops::RangeInclusive<i32> = 1..=4;

/// The fifteen rating columns carried by every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingField {
    ContGlobal,
    ContObjectives,
    ContRelevance,
    ContStructure,
    ContMaterials,
    ContExercises,
    ContDuration,
    TrainerMastery,
    TrainerTeaching,
    TrainerListening,
    TrainerClarity,
    TrainerEngagement,
    OrgWelcome,
    OrgPremises,
    OrgEquipment,
}

impl RatingField {
    pub const COUNT: usize = 15;

    /// Storage order, matching the column layout of the responses table.
    pub const ALL: [RatingField; RatingField::COUNT] = [
        RatingField::ContGlobal,
        RatingField::ContObjectives,
        RatingField::ContRelevance,
        RatingField::ContStructure,
        RatingField::ContMaterials,
        RatingField::ContExercises,
        RatingField::ContDuration,
        RatingField::TrainerMastery,
        RatingField::TrainerTeaching,
        RatingField::TrainerListening,
        RatingField::TrainerClarity,
        RatingField::TrainerEngagement,
        RatingField::OrgWelcome,
        RatingField::OrgPremises,
        RatingField::OrgEquipment,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn column(self) -> &'static str {
        match self {
            RatingField::ContGlobal => "cont_global",
            RatingField::ContObjectives => "cont_objectives",
            RatingField::ContRelevance => "cont_relevance",
            RatingField::ContStructure => "cont_structure",
            RatingField::ContMaterials => "cont_materials",
            RatingField::ContExercises => "cont_exercises",
            RatingField::ContDuration => "cont_duration",
            RatingField::TrainerMastery => "trainer_mastery",
            RatingField::TrainerTeaching => "trainer_teaching",
            RatingField::TrainerListening => "trainer_listening",
            RatingField::TrainerClarity => "trainer_clarity",
            RatingField::TrainerEngagement => "trainer_engagement",
            RatingField::OrgWelcome => "org_welcome",
            RatingField::OrgPremises => "org_premises",
            RatingField::OrgEquipment => "org_equipment",
        }
    }
}

/// A fixed, curated set of criteria reported together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rubric {
    Content,
    Trainer,
}

impl Rubric {
    pub const ALL: [Rubric; 2] = [Rubric::Content, Rubric::Trainer];

    /// Criteria in presentation order. Overall content satisfaction closes the
    /// content rubric rather than opening it.
    pub fn fields(self) -> &'static [RatingField] {
        match self {
            Rubric::Content => &[
                RatingField::ContObjectives,
                RatingField::ContRelevance,
                RatingField::ContStructure,
                RatingField::ContMaterials,
                RatingField::ContExercises,
                RatingField::ContDuration,
                RatingField::ContGlobal,
            ],
            Rubric::Trainer => &[
                RatingField::TrainerMastery,
                RatingField::TrainerClarity,
                RatingField::TrainerTeaching,
                RatingField::TrainerListening,
                RatingField::TrainerEngagement,
            ],
        }
    }
}

/// Answer to "were your expectations met?".
///
/// Older forms offered a middle option that newer ones drop; both variants are
/// read with the same buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Yes,
    Partially,
    No,
}

impl Expectation {
    pub const ALL: [Expectation; 3] = [Expectation::Yes, Expectation::Partially, Expectation::No];

    /// Stored code for this answer.
    pub fn code(self) -> &'static str {
        match self {
            Expectation::Yes => "OUI",
            Expectation::Partially => "PARTIELLEMENT",
            Expectation::No => "NON",
        }
    }

    /// Returns `None` for anything that is not a known code.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OUI" | "YES" => Some(Expectation::Yes),
            "PARTIELLEMENT" | "PARTIALLY" => Some(Expectation::Partially),
            "NON" | "NO" => Some(Expectation::No),
            _ => None,
        }
    }
}
