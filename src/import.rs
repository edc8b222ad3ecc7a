use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::forms;
use crate::models::{Form, NewResponse, Participant, Ratings};
use crate::rubric::{RatingField, LIKERT_RANGE};
use crate::store::FormStore;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub inserted: usize,
    /// Rating cells that were present but unusable and stored as missing.
    pub discarded_ratings: usize,
}

pub struct ImportOptions<'a> {
    pub ip_salt: &'a str,
    /// Load into a closed form anyway, for back-filling paper answers.
    pub allow_closed: bool,
}

/// Blank, non-numeric and out-of-range cells all read as "no rating".
pub fn parse_rating(cell: &str) -> Option<i32> {
    cell.trim()
        .parse::<i32>()
        .ok()
        .filter(|value| LIKERT_RANGE.contains(value))
}

fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "oui" | "x"
    )
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !value.trim().is_empty())
}

/// One CSV row; every column is optional and cells are kept as text so
/// unusable values can be discarded instead of failing the row.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct CsvRow {
    submitted_at: Option<String>,
    last_name: Option<String>,
    first_name: Option<String>,
    job_title: Option<String>,
    department: Option<String>,
    cont_global: Option<String>,
    cont_objectives: Option<String>,
    cont_relevance: Option<String>,
    cont_structure: Option<String>,
    cont_materials: Option<String>,
    cont_exercises: Option<String>,
    cont_duration: Option<String>,
    trainer_mastery: Option<String>,
    trainer_teaching: Option<String>,
    trainer_listening: Option<String>,
    trainer_clarity: Option<String>,
    trainer_engagement: Option<String>,
    org_welcome: Option<String>,
    org_premises: Option<String>,
    org_equipment: Option<String>,
    further_training: Option<String>,
    testimonial: Option<String>,
    expectations_met: Option<String>,
    consent: Option<String>,
    ip: Option<String>,
    user_agent: Option<String>,
}

impl CsvRow {
    fn rating_cell(&self, field: RatingField) -> Option<&str> {
        let cell = match field {
            RatingField::ContGlobal => &self.cont_global,
            RatingField::ContObjectives => &self.cont_objectives,
            RatingField::ContRelevance => &self.cont_relevance,
            RatingField::ContStructure => &self.cont_structure,
            RatingField::ContMaterials => &self.cont_materials,
            RatingField::ContExercises => &self.cont_exercises,
            RatingField::ContDuration => &self.cont_duration,
            RatingField::TrainerMastery => &self.trainer_mastery,
            RatingField::TrainerTeaching => &self.trainer_teaching,
            RatingField::TrainerListening => &self.trainer_listening,
            RatingField::TrainerClarity => &self.trainer_clarity,
            RatingField::TrainerEngagement => &self.trainer_engagement,
            RatingField::OrgWelcome => &self.org_welcome,
            RatingField::OrgPremises => &self.org_premises,
            RatingField::OrgEquipment => &self.org_equipment,
        };
        cell.as_deref()
    }

    fn into_response(
        self,
        record: usize,
        ip_salt: &str,
        discarded_ratings: &mut usize,
    ) -> anyhow::Result<NewResponse> {
        let mut ratings = Ratings::default();
        for field in RatingField::ALL {
            let Some(cell) = self.rating_cell(field) else {
                continue;
            };
            let value = parse_rating(cell);
            if value.is_none() && !cell.trim().is_empty() {
                debug!(record, column = field.column(), cell, "Discarding rating");
                *discarded_ratings += 1;
            }
            ratings.set(field, value);
        }

        let submitted_at = match non_empty(self.submitted_at) {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw.trim())
                    .with_context(|| format!("invalid submitted_at {raw:?} on record {record}"))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(NewResponse {
            submitted_at,
            participant: Participant {
                last_name: self.last_name.unwrap_or_default(),
                first_name: self.first_name.unwrap_or_default(),
                job_title: self.job_title.unwrap_or_default(),
                department: self.department.unwrap_or_default(),
            },
            ratings,
            further_training: non_empty(self.further_training),
            testimonial: non_empty(self.testimonial),
            expectations_met: non_empty(self.expectations_met),
            consent: self.consent.as_deref().map(parse_flag).unwrap_or(false),
            ip_hash: non_empty(self.ip).map(|ip| forms::hash_ip(&ip, ip_salt)),
            user_agent: non_empty(self.user_agent),
        })
    }
}

/// Reads and validates every row; nothing is stored if any row is rejected.
pub async fn import_responses<R: Read>(
    store: &dyn FormStore,
    form: &Form,
    source: R,
    options: &ImportOptions<'_>,
) -> anyhow::Result<ImportOutcome> {
    if !form.is_open && !options.allow_closed {
        anyhow::bail!("form {:?} is closed to new responses", form.slug);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut outcome = ImportOutcome::default();
    let mut responses = Vec::new();

    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let record = idx + 1;
        let row = result.with_context(|| format!("malformed CSV record {record}"))?;
        let response =
            row.into_response(record, options.ip_salt, &mut outcome.discarded_ratings)?;
        responses.push(response);
    }

    for response in responses {
        if options.allow_closed {
            store.create_response(form.id, response).await?;
        } else {
            forms::submit_response(store, form, response).await?;
        }
        outcome.inserted += 1;
    }

    if outcome.discarded_ratings > 0 {
        warn!(
            form = %form.slug,
            discarded = outcome.discarded_ratings,
            "Some rating cells were unusable and stored as missing"
        );
    }

    Ok(outcome)
}

pub async fn import_csv(
    store: &dyn FormStore,
    form: &Form,
    csv_path: &Path,
    options: &ImportOptions<'_>,
) -> anyhow::Result<ImportOutcome> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    import_responses(store, form, file, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::labels::Language;
    use crate::models::FormPatch;
    use crate::store::memory::MemoryStore;
    use chrono::NaiveDate;

    const OPTIONS: ImportOptions<'static> = ImportOptions {
        ip_salt: "salt",
        allow_closed: false,
    };

    async fn sample_form(store: &MemoryStore) -> Form {
        forms::create_form(
            store,
            "Excel avancé",
            "Camille Roux",
            "Lyon",
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
        )
        .await
        .unwrap()
    }

    #[test]
    fn ratings_outside_the_scale_are_dropped() {
        assert_eq!(parse_rating(" 3 "), Some(3));
        assert_eq!(parse_rating("4"), Some(4));
        assert_eq!(parse_rating("5"), None);
        assert_eq!(parse_rating("0"), None);
        assert_eq!(parse_rating("abc"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[tokio::test]
    async fn imports_rows_leniently() {
        let store = MemoryStore::default();
        let form = sample_form(&store).await;
        let csv = "\
submitted_at,last_name,first_name,cont_global,trainer_clarity,expectations_met,further_training,consent,ip,notes
2026-03-12T09:00:00Z,Martin,Lea,4,3,OUI, Excel ,oui,192.0.2.1,ignored
2026-03-12T09:05:00Z,Bernard,Hugo,3,bad,NON,Excel,,,
2026-03-12T09:10:00Z,Petit,Ines,,7,peut-etre,Word,1,,
";

        let outcome = import_responses(&store, &form, csv.as_bytes(), &OPTIONS)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ImportOutcome {
                inserted: 3,
                discarded_ratings: 2,
            }
        );

        let responses = store.responses_for_form(form.id).await.unwrap();
        assert_eq!(responses[0].participant.last_name, "Martin");
        assert!(responses[0].consent);
        assert!(!responses[1].consent);
        assert_eq!(
            responses[0].ip_hash.as_deref(),
            Some(forms::hash_ip("192.0.2.1", "salt").as_str())
        );
        assert_eq!(responses[1].ip_hash, None);
        assert_eq!(responses[2].expectations_met.as_deref(), Some("peut-etre"));

        let summary = aggregate::summarize(&responses, Language::Fr);
        assert_eq!(aggregate::mean_of(&responses, RatingField::ContGlobal), 3.5);
        assert_eq!(aggregate::mean_of(&responses, RatingField::TrainerClarity), 3.0);
        assert_eq!(summary.expectations.yes_count, 1);
        assert_eq!(summary.expectations.no_count, 1);
        assert_eq!(summary.suggestions, vec!["Excel", "Word"]);
    }

    #[tokio::test]
    async fn closed_forms_need_explicit_override() {
        let store = MemoryStore::default();
        let form = sample_form(&store).await;
        let form = store
            .update_form(
                form.id,
                FormPatch {
                    is_open: Some(false),
                    ..FormPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        let csv = "cont_global\n4\n";

        assert!(import_responses(&store, &form, csv.as_bytes(), &OPTIONS)
            .await
            .is_err());

        let options = ImportOptions {
            ip_salt: "",
            allow_closed: true,
        };
        let outcome = import_responses(&store, &form, csv.as_bytes(), &options)
            .await
            .unwrap();
        assert_eq!(outcome.inserted, 1);
    }

    #[tokio::test]
    async fn failed_import_stores_nothing() {
        let store = MemoryStore::default();
        let form = sample_form(&store).await;
        let csv = "\
submitted_at,cont_global,further_training
2026-03-12T09:00:00Z,4,Excel
2026-03-12T09:05:00Z,3,Word
yesterday,2,Access
";

        for _ in 0..2 {
            assert!(import_responses(&store, &form, csv.as_bytes(), &OPTIONS)
                .await
                .is_err());
        }
        assert!(store.responses_for_form(form.id).await.unwrap().is_empty());

        let fixed = csv.replace("yesterday", "2026-03-12T09:10:00Z");
        let outcome = import_responses(&store, &form, fixed.as_bytes(), &OPTIONS)
            .await
            .unwrap();
        assert_eq!(outcome.inserted, 3);
        assert_eq!(store.responses_for_form(form.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rejects_bad_timestamps() {
        let store = MemoryStore::default();
        let form = sample_form(&store).await;
        let csv = "submitted_at,cont_global\nyesterday,4\n";
        let err = import_responses(&store, &form, csv.as_bytes(), &OPTIONS)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("submitted_at"));
    }
}
