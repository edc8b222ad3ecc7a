use std::str::FromStr;

use serde::Serialize;

use crate::rubric::{Expectation, RatingField, Rubric};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => anyhow::bail!("unsupported language {other:?} (expected fr or en)"),
        }
    }
}

/// Fixed interface strings for one language.
pub struct Labels {
    pub report_title: &'static str,
    pub trainer: &'static str,
    pub location: &'static str,
    pub session_date: &'static str,
    pub status: &'static str,
    pub open: &'static str,
    pub closed: &'static str,
    pub responses: &'static str,
    pub criterion: &'static str,
    pub mean: &'static str,
    pub expectations: &'static str,
    pub suggestions: &'static str,
    pub no_responses: &'static str,
    pub no_suggestions: &'static str,
    pub submitted_at: &'static str,
    pub last_name: &'static str,
    pub first_name: &'static str,
    pub job_title: &'static str,
    pub department: &'static str,
    pub further_training: &'static str,
    pub testimonial: &'static str,
    pub consent: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
}

static FRENCH: Labels = Labels {
    report_title: "Évaluation de la formation",
    trainer: "Formateur",
    location: "Lieu",
    session_date: "Date",
    status: "Statut",
    open: "ouvert",
    closed: "clôturé",
    responses: "Réponses",
    criterion: "Critère",
    mean: "Moyenne",
    expectations: "Attentes satisfaites",
    suggestions: "Formations complémentaires souhaitées",
    no_responses: "Aucune réponse pour le moment.",
    no_suggestions: "Aucune suggestion.",
    submitted_at: "Soumis le",
    last_name: "Nom",
    first_name: "Prénom",
    job_title: "Fonction",
    department: "Service",
    further_training: "Formations complémentaires",
    testimonial: "Témoignage",
    consent: "Consentement",
    yes: "oui",
    no: "non",
};

static ENGLISH: Labels = Labels {
    report_title: "Training evaluation",
    trainer: "Trainer",
    location: "Location",
    session_date: "Date",
    status: "Status",
    open: "open",
    closed: "closed",
    responses: "Responses",
    criterion: "Criterion",
    mean: "Mean",
    expectations: "Expectations met",
    suggestions: "Requested further training",
    no_responses: "No responses yet.",
    no_suggestions: "No suggestions.",
    submitted_at: "Submitted at",
    last_name: "Last name",
    first_name: "First name",
    job_title: "Job title",
    department: "Department",
    further_training: "Further training",
    testimonial: "Testimonial",
    consent: "Consent",
    yes: "yes",
    no: "no",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Fr => &FRENCH,
        Language::En => &ENGLISH,
    }
}

/// Localized open/closed state of a form.
pub fn status_label(is_open: bool, language: Language) -> &'static str {
    let text = labels(language);
    if is_open {
        text.open
    } else {
        text.closed
    }
}

pub fn field_label(field: RatingField, language: Language) -> &'static str {
    use RatingField::*;

    match language {
        Language::Fr => match field {
            ContGlobal => "Satisfaction globale sur le contenu",
            ContObjectives => "Atteinte des objectifs",
            ContRelevance => "Adéquation avec votre poste",
            ContStructure => "Progression pédagogique",
            ContMaterials => "Qualité des supports",
            ContExercises => "Exercices pratiques",
            ContDuration => "Durée de la formation",
            TrainerMastery => "Maîtrise du sujet",
            TrainerTeaching => "Pédagogie",
            TrainerListening => "Écoute des participants",
            TrainerClarity => "Clarté des explications",
            TrainerEngagement => "Animation du groupe",
            OrgWelcome => "Accueil",
            OrgPremises => "Locaux",
            OrgEquipment => "Matériel",
        },
        Language::En => match field {
            ContGlobal => "Overall content satisfaction",
            ContObjectives => "Objectives achieved",
            ContRelevance => "Relevance to your role",
            ContStructure => "Course progression",
            ContMaterials => "Quality of materials",
            ContExercises => "Hands-on exercises",
            ContDuration => "Course length",
            TrainerMastery => "Subject mastery",
            TrainerTeaching => "Teaching skills",
            TrainerListening => "Listening to participants",
            TrainerClarity => "Clarity of explanations",
            TrainerEngagement => "Group engagement",
            OrgWelcome => "Welcome",
            OrgPremises => "Premises",
            OrgEquipment => "Equipment",
        },
    }
}

pub fn rubric_title(rubric: Rubric, language: Language) -> &'static str {
    match (rubric, language) {
        (Rubric::Content, Language::Fr) => "Contenu de la formation",
        (Rubric::Content, Language::En) => "Training content",
        (Rubric::Trainer, Language::Fr) => "Formateur",
        (Rubric::Trainer, Language::En) => "Trainer",
    }
}

pub fn expectation_label(answer: Expectation, language: Language) -> &'static str {
    match (answer, language) {
        (Expectation::Yes, Language::Fr) => "Oui",
        (Expectation::Partially, Language::Fr) => "Partiellement",
        (Expectation::No, Language::Fr) => "Non",
        (Expectation::Yes, Language::En) => "Yes",
        (Expectation::Partially, Language::En) => "Partially",
        (Expectation::No, Language::En) => "No",
    }
}
