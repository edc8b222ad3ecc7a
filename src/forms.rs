use anyhow::Context;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::aggregate;
use crate::labels::Language;
use crate::models::{Form, FormPatch, FormSummary, NewForm, NewResponse, ResponseRecord};
use crate::store::FormStore;

const SLUG_MAX_LEN: usize = 48;

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Lowercase ASCII rendition of `title` with runs of other characters
/// collapsed to a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
        if slug.len() >= SLUG_MAX_LEN {
            break;
        }
    }

    slug
}

/// Slug from the title plus a random suffix so identical titles never collide.
pub fn generate_slug(title: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let base = slugify(title);
    if base.is_empty() {
        format!("form-{}", &suffix[..8])
    } else {
        format!("{base}-{}", &suffix[..8])
    }
}

pub fn public_url(base_url: &str, slug: &str) -> String {
    format!("{}/f/{}", base_url.trim_end_matches('/'), slug)
}

/// Salted SHA-256 of a submitter address, hex encoded.
pub fn hash_ip(ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(ip.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub async fn create_form(
    store: &dyn FormStore,
    title: &str,
    trainer: &str,
    location: &str,
    session_date: NaiveDate,
) -> anyhow::Result<Form> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("form title must not be empty");
    }

    let form = store
        .create_form(NewForm {
            title: title.to_string(),
            trainer: trainer.trim().to_string(),
            location: location.trim().to_string(),
            session_date,
            slug: generate_slug(title),
        })
        .await?;
    info!(form_id = %form.id, slug = %form.slug, "Form created");
    Ok(form)
}

pub async fn resolve_form(store: &dyn FormStore, slug: &str) -> anyhow::Result<Form> {
    store
        .find_form_by_slug(slug)
        .await?
        .with_context(|| format!("no form with slug {slug:?}"))
}

pub async fn update_form(
    store: &dyn FormStore,
    slug: &str,
    patch: FormPatch,
) -> anyhow::Result<Form> {
    let form = resolve_form(store, slug).await?;
    if patch.is_empty() {
        return Ok(form);
    }
    let updated = store
        .update_form(form.id, patch)
        .await?
        .with_context(|| format!("form {slug:?} disappeared during update"))?;
    info!(form_id = %updated.id, is_open = updated.is_open, "Form updated");
    Ok(updated)
}

pub async fn delete_form(store: &dyn FormStore, slug: &str) -> anyhow::Result<()> {
    let form = resolve_form(store, slug).await?;
    if !store.delete_form(form.id).await? {
        anyhow::bail!("form {slug:?} was already deleted");
    }
    info!(form_id = %form.id, "Form deleted with its responses");
    Ok(())
}

/// Records a participant submission; closed forms refuse new responses.
pub async fn submit_response(
    store: &dyn FormStore,
    form: &Form,
    response: NewResponse,
) -> anyhow::Result<ResponseRecord> {
    if !form.is_open {
        anyhow::bail!("form {:?} is closed to new responses", form.slug);
    }
    store.create_response(form.id, response).await
}

pub async fn load_summary(
    store: &dyn FormStore,
    form: &Form,
    language: Language,
) -> anyhow::Result<(Vec<ResponseRecord>, FormSummary)> {
    let responses = store.responses_for_form(form.id).await?;
    let summary = aggregate::summarize(&responses, language);
    Ok((responses, summary))
}
