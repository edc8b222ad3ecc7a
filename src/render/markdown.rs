use std::fmt::Write;

use crate::labels::{expectation_label, labels, rubric_title, status_label};
use crate::models::{CriterionMean, Form, FormSummary};
use crate::rubric::{Expectation, Rubric, LIKERT_RANGE};

const BAR_WIDTH: usize = 20;

/// Text bar widget proportional to `mean` on the Likert scale.
pub fn bar(mean: f64) -> String {
    let max = f64::from(*LIKERT_RANGE.end());
    let filled = ((mean.clamp(0.0, max) / max) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn write_rubric(output: &mut String, title: &str, entries: &[CriterionMean]) {
    let _ = writeln!(output, "### {title}");
    for entry in entries {
        let _ = writeln!(
            output,
            "- {} `{}` {:.2}/4",
            entry.label,
            bar(entry.mean),
            entry.mean
        );
    }
    let _ = writeln!(output);
}

pub fn build_report(form: &Form, summary: &FormSummary) -> String {
    let text = labels(summary.language);
    let mut output = String::new();

    let _ = writeln!(output, "# {} : {}", text.report_title, form.title);
    let _ = writeln!(output, "- {}: {}", text.trainer, form.trainer);
    let _ = writeln!(output, "- {}: {}", text.location, form.location);
    let _ = writeln!(output, "- {}: {}", text.session_date, form.session_date);
    let _ = writeln!(
        output,
        "- {}: {}",
        text.status,
        status_label(form.is_open, summary.language)
    );
    let _ = writeln!(output, "- {}: {}", text.responses, summary.count);
    let _ = writeln!(output);

    if summary.count == 0 {
        let _ = writeln!(output, "{}", text.no_responses);
        return output;
    }

    let _ = writeln!(output, "## {} / {}", text.criterion, text.mean);
    for rubric in Rubric::ALL {
        write_rubric(
            &mut output,
            rubric_title(rubric, summary.language),
            summary.rubric(rubric),
        );
    }

    let distribution = &summary.expectations;
    let _ = writeln!(output, "## {}", text.expectations);
    for answer in Expectation::ALL {
        let _ = writeln!(
            output,
            "- {}: {} ({}%)",
            expectation_label(answer, summary.language),
            distribution.count(answer),
            distribution.pct(answer)
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## {}", text.suggestions);
    if summary.suggestions.is_empty() {
        let _ = writeln!(output, "{}", text.no_suggestions);
    } else {
        for suggestion in &summary.suggestions {
            let _ = writeln!(output, "- {suggestion}");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::labels::Language;
    use crate::models::{Participant, Ratings, ResponseRecord};
    use crate::rubric::RatingField;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn sample_form() -> Form {
        Form {
            id: Uuid::new_v4(),
            title: "Excel avancé".to_string(),
            trainer: "Camille Roux".to_string(),
            location: "Lyon".to_string(),
            session_date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
            is_open: true,
            slug: "excel-avance-1a2b3c4d".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_response(score: i32, expectations: &str, suggestion: &str) -> ResponseRecord {
        ResponseRecord {
            id: Uuid::new_v4(),
            form_id: Uuid::nil(),
            submitted_at: Utc::now(),
            participant: Participant::default(),
            ratings: Ratings::default().with(RatingField::TrainerMastery, score),
            further_training: Some(suggestion.to_string()),
            testimonial: None,
            expectations_met: Some(expectations.to_string()),
            consent: true,
            ip_hash: None,
            user_agent: None,
        }
    }

    #[test]
    fn bar_scales_with_mean() {
        assert_eq!(bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(bar(4.0), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(2.0).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(9.0), bar(4.0));
    }

    #[test]
    fn report_lists_sections_in_order() {
        let responses = vec![
            sample_response(4, "OUI", "Power BI"),
            sample_response(3, "NON", "Power BI"),
        ];
        let summary = aggregate::summarize(&responses, Language::En);
        let report = build_report(&sample_form(), &summary);

        assert!(report.starts_with("# Training evaluation : Excel avancé"));
        assert!(report.contains("- Status: open"));
        assert!(report.contains("- Responses: 2"));
        assert!(report.contains("- Subject mastery `"));
        assert!(report.contains("3.50/4"));
        assert!(report.contains("- Yes: 1 (50%)"));
        assert!(report.contains("- Partially: 0 (0%)"));
        assert!(report.contains("- Power BI"));

        let content = report.find("### Training content").unwrap();
        let trainer = report.find("### Trainer").unwrap();
        let expectations = report.find("## Expectations met").unwrap();
        assert!(content < trainer && trainer < expectations);
    }

    #[test]
    fn empty_report_says_so() {
        let summary = aggregate::summarize(&[], Language::Fr);
        let report = build_report(&sample_form(), &summary);
        assert!(report.contains("- Statut: ouvert"));
        assert!(report.contains("Aucune réponse pour le moment."));
        assert!(!report.contains("## Attentes satisfaites"));
    }
}
