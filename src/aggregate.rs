use std::collections::HashSet;

use crate::labels::{field_label, Language};
use crate::models::{CriterionMean, ExpectationsDistribution, FormSummary, ResponseRecord};
use crate::rubric::{Expectation, RatingField, Rubric, LIKERT_RANGE};

pub fn count_responses(responses: &[ResponseRecord]) -> usize {
    responses.len()
}

/// A rating counts only when present and inside the Likert range.
fn likert_value(response: &ResponseRecord, field: RatingField) -> Option<i32> {
    response
        .ratings
        .get(field)
        .filter(|value| LIKERT_RANGE.contains(value))
}

/// Sum and count of the valid values of `field`.
fn tally(responses: &[ResponseRecord], field: RatingField) -> (i64, i64) {
    responses
        .iter()
        .filter_map(|response| likert_value(response, field))
        .fold((0, 0), |(sum, count), value| (sum + i64::from(value), count + 1))
}

/// Unrounded mean of the valid values of `field`, or 0.0 when there are none.
pub fn raw_mean(responses: &[ResponseRecord], field: RatingField) -> f64 {
    let (sum, count) = tally(responses, field);
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Mean of `field` rounded half-up to two decimals for display.
pub fn mean_of(responses: &[ResponseRecord], field: RatingField) -> f64 {
    let (sum, count) = tally(responses, field);
    if count == 0 {
        return 0.0;
    }
    hundredths_half_up(sum, count) as f64 / 100.0
}

/// `sum / count` in hundredths, rounded half-up in integer arithmetic so that
/// exact ties such as 41/40 are not lost to binary floating point.
fn hundredths_half_up(sum: i64, count: i64) -> i64 {
    (sum * 200 + count) / (2 * count)
}

pub fn rubric_means(
    responses: &[ResponseRecord],
    rubric: Rubric,
    language: Language,
) -> Vec<CriterionMean> {
    rubric
        .fields()
        .iter()
        .map(|field| CriterionMean {
            field: *field,
            label: field_label(*field, language).to_string(),
            mean: mean_of(responses, *field),
        })
        .collect()
}

fn share(count: usize, total: usize) -> u32 {
    (count as f64 * 100.0 / total as f64).round() as u32
}

pub fn expectations_distribution(responses: &[ResponseRecord]) -> ExpectationsDistribution {
    let mut distribution = ExpectationsDistribution::default();

    for response in responses {
        let answer = response
            .expectations_met
            .as_deref()
            .and_then(Expectation::parse);

        match answer {
            Some(Expectation::Yes) => distribution.yes_count += 1,
            Some(Expectation::Partially) => distribution.partial_count += 1,
            Some(Expectation::No) => distribution.no_count += 1,
            None => {}
        }
    }

    let total = distribution.total();
    if total == 0 {
        return distribution;
    }

    // The last bucket takes the remainder so the shares always add up to 100.
    distribution.yes_pct = share(distribution.yes_count, total);
    distribution.partial_pct =
        share(distribution.partial_count, total).min(100 - distribution.yes_pct);
    distribution.no_pct = 100 - distribution.yes_pct - distribution.partial_pct;
    distribution
}

pub fn collect_suggestions(responses: &[ResponseRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut suggestions = Vec::new();

    for response in responses {
        let Some(text) = response.further_training.as_deref() else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() || !seen.insert(text) {
            continue;
        }
        suggestions.push(text.to_string());
    }

    suggestions
}

pub fn summarize(responses: &[ResponseRecord], language: Language) -> FormSummary {
    FormSummary {
        language,
        count: count_responses(responses),
        content: rubric_means(responses, Rubric::Content, language),
        trainer: rubric_means(responses, Rubric::Trainer, language),
        expectations: expectations_distribution(responses),
        suggestions: collect_suggestions(responses),
    }
}
