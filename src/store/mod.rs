use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Form, FormPatch, NewForm, NewResponse, ResponseRecord};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Persistence for forms and their responses.
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn find_form(&self, id: Uuid) -> anyhow::Result<Option<Form>>;

    async fn find_form_by_slug(&self, slug: &str) -> anyhow::Result<Option<Form>>;

    /// Most recent sessions first.
    async fn list_forms(&self) -> anyhow::Result<Vec<Form>>;

    async fn create_form(&self, form: NewForm) -> anyhow::Result<Form>;

    /// Returns `None` when no form has this id.
    async fn update_form(&self, id: Uuid, patch: FormPatch) -> anyhow::Result<Option<Form>>;

    /// Deletes the form together with its responses.
    async fn delete_form(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn create_response(
        &self,
        form_id: Uuid,
        response: NewResponse,
    ) -> anyhow::Result<ResponseRecord>;

    /// Responses ordered by submission time, oldest first.
    async fn responses_for_form(&self, form_id: Uuid) -> anyhow::Result<Vec<ResponseRecord>>;
}
