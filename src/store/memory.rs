use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{Form, FormPatch, NewForm, NewResponse, ResponseRecord};
use crate::store::FormStore;

/// Store backed by vectors, used by tests in place of Postgres.
#[derive(Default)]
pub struct MemoryStore {
    forms: Mutex<Vec<Form>>,
    responses: Mutex<Vec<ResponseRecord>>,
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn find_form(&self, id: Uuid) -> anyhow::Result<Option<Form>> {
        let forms = self.forms.lock().unwrap();
        Ok(forms.iter().find(|form| form.id == id).cloned())
    }

    async fn find_form_by_slug(&self, slug: &str) -> anyhow::Result<Option<Form>> {
        let forms = self.forms.lock().unwrap();
        Ok(forms.iter().find(|form| form.slug == slug).cloned())
    }

    async fn list_forms(&self) -> anyhow::Result<Vec<Form>> {
        let mut forms = self.forms.lock().unwrap().clone();
        forms.sort_by(|a, b| {
            b.session_date
                .cmp(&a.session_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(forms)
    }

    async fn create_form(&self, form: NewForm) -> anyhow::Result<Form> {
        let mut forms = self.forms.lock().unwrap();
        if forms.iter().any(|existing| existing.slug == form.slug) {
            anyhow::bail!("slug {} already exists", form.slug);
        }
        let created = Form {
            id: Uuid::new_v4(),
            title: form.title,
            trainer: form.trainer,
            location: form.location,
            session_date: form.session_date,
            is_open: true,
            slug: form.slug,
            created_at: Utc::now(),
        };
        forms.push(created.clone());
        Ok(created)
    }

    async fn update_form(&self, id: Uuid, patch: FormPatch) -> anyhow::Result<Option<Form>> {
        let mut forms = self.forms.lock().unwrap();
        let Some(form) = forms.iter_mut().find(|form| form.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            form.title = title;
        }
        if let Some(session_date) = patch.session_date {
            form.session_date = session_date;
        }
        if let Some(location) = patch.location {
            form.location = location;
        }
        if let Some(is_open) = patch.is_open {
            form.is_open = is_open;
        }
        Ok(Some(form.clone()))
    }

    async fn delete_form(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut forms = self.forms.lock().unwrap();
        let before = forms.len();
        forms.retain(|form| form.id != id);
        if forms.len() == before {
            return Ok(false);
        }
        self.responses
            .lock()
            .unwrap()
            .retain(|response| response.form_id != id);
        Ok(true)
    }

    async fn create_response(
        &self,
        form_id: Uuid,
        response: NewResponse,
    ) -> anyhow::Result<ResponseRecord> {
        if self.find_form(form_id).await?.is_none() {
            anyhow::bail!("form {form_id} does not exist");
        }
        let record = ResponseRecord {
            id: Uuid::new_v4(),
            form_id,
            submitted_at: response.submitted_at.unwrap_or_else(Utc::now),
            participant: response.participant,
            ratings: response.ratings,
            further_training: response.further_training,
            testimonial: response.testimonial,
            expectations_met: response.expectations_met,
            consent: response.consent,
            ip_hash: response.ip_hash,
            user_agent: response.user_agent,
        };
        self.responses.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn responses_for_form(&self, form_id: Uuid) -> anyhow::Result<Vec<ResponseRecord>> {
        let mut responses: Vec<ResponseRecord> = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|response| response.form_id == form_id)
            .cloned()
            .collect();
        responses.sort_by_key(|response| response.submitted_at);
        Ok(responses)
    }
}
