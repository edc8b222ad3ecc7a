use std::io::Write;

use anyhow::Result;
use chrono::SecondsFormat;
use tracing::debug;

use crate::labels::{expectation_label, field_label, labels, rubric_title, Language};
use crate::models::{FormSummary, ResponseRecord};
use crate::rubric::{Expectation, RatingField, Rubric};

/// Writes one row per response with localized headers.
pub fn write_responses<W: Write>(
    writer: W,
    responses: &[ResponseRecord],
    language: Language,
) -> Result<()> {
    let text = labels(language);
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        text.submitted_at,
        text.last_name,
        text.first_name,
        text.job_title,
        text.department,
    ];
    header.extend(RatingField::ALL.iter().map(|field| field_label(*field, language)));
    header.extend([
        text.expectations,
        text.further_training,
        text.testimonial,
        text.consent,
    ]);
    writer.write_record(&header)?;

    for response in responses {
        let mut row = vec![
            response
                .submitted_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            response.participant.last_name.clone(),
            response.participant.first_name.clone(),
            response.participant.job_title.clone(),
            response.participant.department.clone(),
        ];
        row.extend(RatingField::ALL.iter().map(|field| {
            response
                .ratings
                .get(*field)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
        let expectations = match response.expectations_met.as_deref() {
            Some(raw) => Expectation::parse(raw)
                .map(|answer| expectation_label(answer, language).to_string())
                .unwrap_or_else(|| raw.to_string()),
            None => String::new(),
        };
        row.extend([
            expectations,
            response.further_training.clone().unwrap_or_default(),
            response.testimonial.clone().unwrap_or_default(),
            if response.consent { text.yes } else { text.no }.to_string(),
        ]);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    debug!(rows = responses.len(), "Wrote response export");
    Ok(())
}

/// Writes the rubric means as `rubric, criterion, mean` rows.
pub fn write_summary<W: Write>(writer: W, summary: &FormSummary) -> Result<()> {
    let text = labels(summary.language);
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["", text.criterion, text.mean])?;
    for rubric in Rubric::ALL {
        let title = rubric_title(rubric, summary.language);
        for entry in summary.rubric(rubric) {
            let mean = format!("{:.2}", entry.mean);
            writer.write_record([title, entry.label.as_str(), mean.as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::models::{Participant, Ratings};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample_response() -> ResponseRecord {
        ResponseRecord {
            id: Uuid::new_v4(),
            form_id: Uuid::nil(),
            submitted_at: Utc.with_ymd_and_hms(2026, 3, 12, 9, 30, 0).unwrap(),
            participant: Participant {
                last_name: "Martin".to_string(),
                first_name: "Léa".to_string(),
                job_title: "Comptable".to_string(),
                department: "Finance".to_string(),
            },
            ratings: Ratings::default()
                .with(RatingField::ContGlobal, 4)
                .with(RatingField::OrgEquipment, 2),
            further_training: Some("Power BI".to_string()),
            testimonial: Some("Très bien, merci".to_string()),
            expectations_met: Some("PARTIELLEMENT".to_string()),
            consent: true,
            ip_hash: None,
            user_agent: None,
        }
    }

    #[test]
    fn response_export_has_one_row_per_response() {
        let mut buffer = Vec::new();
        write_responses(&mut buffer, &[sample_response(), sample_response()], Language::En)
            .unwrap();
        let content = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Submitted at,Last name,First name"));
        assert!(lines[0].contains("Overall content satisfaction"));
        assert!(lines[1].starts_with("2026-03-12T09:30:00Z,Martin,Léa,Comptable,Finance,4,,"));
        assert!(lines[1].ends_with(",2,Partially,Power BI,\"Très bien, merci\",yes"));
    }

    #[test]
    fn response_export_header_matches_row_width() {
        let mut buffer = Vec::new();
        write_responses(&mut buffer, &[sample_response()], Language::Fr).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let width = reader.headers().unwrap().len();
        assert_eq!(width, 5 + RatingField::COUNT + 4);
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), width);
        }
    }

    #[test]
    fn summary_export_lists_every_criterion() {
        let summary = aggregate::summarize(&[sample_response()], Language::Fr);
        let mut buffer = Vec::new();
        write_summary(&mut buffer, &summary).unwrap();
        let content = String::from_utf8(buffer).unwrap();

        assert_eq!(content.lines().count(), 1 + 7 + 5);
        assert!(content.contains("Contenu de la formation,Satisfaction globale sur le contenu,4.00"));
        assert!(content.contains("Formateur,Maîtrise du sujet,0.00"));
    }
}
