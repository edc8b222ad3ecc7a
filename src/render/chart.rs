//! Chart.js bar-chart configurations, handed as-is to an external image
//! renderer.

use serde_json::{json, Value};

use crate::labels::rubric_title;
use crate::models::FormSummary;
use crate::rubric::{Rubric, LIKERT_RANGE};

pub fn rubric_chart(summary: &FormSummary, rubric: Rubric) -> Value {
    let entries = summary.rubric(rubric);
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
    let data: Vec<f64> = entries.iter().map(|entry| entry.mean).collect();
    let title = rubric_title(rubric, summary.language);
    let max = *LIKERT_RANGE.end();

    json!({
        "type": "horizontalBar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": title,
                "data": data
            }]
        },
        "options": {
            "title": { "display": true, "text": title },
            "legend": { "display": false },
            "scales": {
                "xAxes": [{
                    "ticks": {
                        "min": 0,
                        "max": max,
                        "stepSize": 1
                    }
                }]
            }
        }
    })
}

/// One chart per rubric, keyed by rubric name.
pub fn charts(summary: &FormSummary) -> Value {
    json!({
        "content": rubric_chart(summary, Rubric::Content),
        "trainer": rubric_chart(summary, Rubric::Trainer)
    })
}
