use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    Form, FormPatch, NewForm, NewResponse, Participant, Ratings, ResponseRecord,
};
use crate::rubric::RatingField;
use crate::store::FormStore;

const FORM_COLUMNS: &str =
    "id, title, trainer, location, session_date, is_open, slug, created_at";

const LEADING_RESPONSE_COLUMNS: [&str; 7] = [
    "id",
    "form_id",
    "submitted_at",
    "last_name",
    "first_name",
    "job_title",
    "department",
];

const TRAILING_RESPONSE_COLUMNS: [&str; 6] = [
    "further_training",
    "testimonial",
    "expectations_met",
    "consent",
    "ip_hash",
    "user_agent",
];

fn response_columns() -> Vec<&'static str> {
    LEADING_RESPONSE_COLUMNS
        .iter()
        .copied()
        .chain(RatingField::ALL.iter().map(|field| field.column()))
        .chain(TRAILING_RESPONSE_COLUMNS.iter().copied())
        .collect()
}

fn form_from_row(row: &PgRow) -> anyhow::Result<Form> {
    Ok(Form {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        trainer: row.try_get("trainer")?,
        location: row.try_get("location")?,
        session_date: row.try_get("session_date")?,
        is_open: row.try_get("is_open")?,
        slug: row.try_get("slug")?,
        created_at: row.try_get("created_at")?,
    })
}

fn response_from_row(row: &PgRow) -> anyhow::Result<ResponseRecord> {
    let mut ratings = Ratings::default();
    for field in RatingField::ALL {
        ratings.set(field, row.try_get(field.column())?);
    }

    Ok(ResponseRecord {
        id: row.try_get("id")?,
        form_id: row.try_get("form_id")?,
        submitted_at: row.try_get("submitted_at")?,
        participant: Participant {
            last_name: row.try_get("last_name")?,
            first_name: row.try_get("first_name")?,
            job_title: row.try_get("job_title")?,
            department: row.try_get("department")?,
        },
        ratings,
        further_training: row.try_get("further_training")?,
        testimonial: row.try_get("testimonial")?,
        expectations_met: row.try_get("expectations_met")?,
        consent: row.try_get("consent")?,
        ip_hash: row.try_get("ip_hash")?,
        user_agent: row.try_get("user_agent")?,
    })
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        Ok(Self { pool })
    }

    pub async fn init_db(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl FormStore for PgStore {
    async fn find_form(&self, id: Uuid) -> anyhow::Result<Option<Form>> {
        let sql = format!("SELECT {FORM_COLUMNS} FROM training_eval.forms WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(form_from_row).transpose()
    }

    async fn find_form_by_slug(&self, slug: &str) -> anyhow::Result<Option<Form>> {
        let sql = format!("SELECT {FORM_COLUMNS} FROM training_eval.forms WHERE slug = $1");
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(form_from_row).transpose()
    }

    async fn list_forms(&self) -> anyhow::Result<Vec<Form>> {
        let sql = format!(
            "SELECT {FORM_COLUMNS} FROM training_eval.forms \
             ORDER BY session_date DESC, created_at DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(form_from_row).collect()
    }

    async fn create_form(&self, form: NewForm) -> anyhow::Result<Form> {
        let sql = format!(
            r#"
            INSERT INTO training_eval.forms
            (id, title, trainer, location, session_date, is_open, slug)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING {FORM_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&form.title)
            .bind(&form.trainer)
            .bind(&form.location)
            .bind(form.session_date)
            .bind(&form.slug)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to insert form {}", form.slug))?;
        form_from_row(&row)
    }

    async fn update_form(&self, id: Uuid, patch: FormPatch) -> anyhow::Result<Option<Form>> {
        let sql = format!(
            r#"
            UPDATE training_eval.forms
            SET title = COALESCE($2, title),
                session_date = COALESCE($3, session_date),
                location = COALESCE($4, location),
                is_open = COALESCE($5, is_open)
            WHERE id = $1
            RETURNING {FORM_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.session_date)
            .bind(patch.location)
            .bind(patch.is_open)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(form_from_row).transpose()
    }

    async fn delete_form(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM training_eval.forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_response(
        &self,
        form_id: Uuid,
        response: NewResponse,
    ) -> anyhow::Result<ResponseRecord> {
        let columns = response_columns();
        let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${n}")).collect();
        let column_list = columns.join(", ");
        let sql = format!(
            "INSERT INTO training_eval.responses ({column_list}) VALUES ({}) RETURNING {column_list}",
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(form_id)
            .bind(response.submitted_at.unwrap_or_else(Utc::now))
            .bind(&response.participant.last_name)
            .bind(&response.participant.first_name)
            .bind(&response.participant.job_title)
            .bind(&response.participant.department);

        for field in RatingField::ALL {
            query = query.bind(response.ratings.get(field));
        }

        let row = query
            .bind(&response.further_training)
            .bind(&response.testimonial)
            .bind(&response.expectations_met)
            .bind(response.consent)
            .bind(&response.ip_hash)
            .bind(&response.user_agent)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to insert response for form {form_id}"))?;

        response_from_row(&row)
    }

    async fn responses_for_form(&self, form_id: Uuid) -> anyhow::Result<Vec<ResponseRecord>> {
        let sql = format!(
            "SELECT {} FROM training_eval.responses WHERE form_id = $1 \
             ORDER BY submitted_at ASC, id ASC",
            response_columns().join(", ")
        );
        let rows = sqlx::query(&sql).bind(form_id).fetch_all(&self.pool).await?;
        debug!(%form_id, rows = rows.len(), "Fetched responses");
        rows.iter().map(response_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_columns_cover_every_rating() {
        let columns = response_columns();
        assert_eq!(columns.len(), 7 + RatingField::COUNT + 6);
        assert_eq!(columns[0], "id");
        assert_eq!(columns[7], "cont_global");
        assert_eq!(columns.last(), Some(&"user_agent"));
        for field in RatingField::ALL {
            assert!(columns.contains(&field.column()));
        }
    }
}
