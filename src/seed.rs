use anyhow::Context;
use chrono::{NaiveDate, TimeZone, Utc};

use crate::forms;
use crate::models::{Form, NewResponse, Participant, Ratings};
use crate::rubric::{Expectation, RatingField};
use crate::store::FormStore;

/// Inserts a demo form with a handful of realistic answers.
pub async fn seed(store: &dyn FormStore, ip_salt: &str) -> anyhow::Result<Form> {
    let form = forms::create_form(
        store,
        "Excel : tableaux croisés dynamiques",
        "Camille Roux",
        "Lyon - salle Rhône",
        NaiveDate::from_ymd_opt(2026, 2, 2).context("invalid date")?,
    )
    .await?;

    let answers = vec![
        (
            ("Martin", "Léa", "Comptable", "Finance"),
            [4, 4, 3, 4, 3, 4, 3, 4, 4, 4, 3, 4, 4, 3, 3],
            Expectation::Yes,
            Some("Power BI"),
            Some("Très concret, je réutilise déjà les TCD."),
            "192.0.2.14",
        ),
        (
            ("Bernard", "Hugo", "Assistant RH", "Ressources humaines"),
            [3, 3, 4, 3, 3, 2, 2, 4, 3, 4, 3, 3, 4, 2, 3],
            Expectation::Partially,
            Some("Power BI "),
            None,
            "198.51.100.7",
        ),
        (
            ("Petit", "Inès", "Chargée de mission", "Direction"),
            [2, 3, 2, 3, 2, 3, 2, 3, 2, 3, 3, 2, 3, 3, 2],
            Expectation::No,
            Some("Macros VBA"),
            None,
            "203.0.113.22",
        ),
    ];

    for (minute, (participant, scores, expectations, further_training, testimonial, ip)) in
        answers.into_iter().enumerate()
    {
        let (last_name, first_name, job_title, department) = participant;
        let mut ratings = Ratings::default();
        for (field, score) in RatingField::ALL.iter().zip(scores) {
            ratings.set(*field, Some(score));
        }

        let submitted_at = Utc
            .with_ymd_and_hms(2026, 2, 2, 17, minute as u32, 0)
            .single()
            .context("invalid timestamp")?;

        forms::submit_response(
            store,
            &form,
            NewResponse {
                submitted_at: Some(submitted_at),
                participant: Participant {
                    last_name: last_name.to_string(),
                    first_name: first_name.to_string(),
                    job_title: job_title.to_string(),
                    department: department.to_string(),
                },
                ratings,
                further_training: further_training.map(str::to_string),
                testimonial: testimonial.map(str::to_string),
                expectations_met: Some(expectations.code().to_string()),
                consent: true,
                ip_hash: Some(forms::hash_ip(ip, ip_salt)),
                user_agent: Some("seed".to_string()),
            },
        )
        .await?;
    }

    Ok(form)
}
