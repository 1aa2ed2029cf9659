// Job posting management

use super::{Apply, Collection, CollectionState, Mutation, MutationRequest};
use crate::client::AuthClient;
use crate::envelope::Entity;
use crate::error::{ClientError, Result};
use crate::forms;
use crate::session_kind::SessionKind;
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Create-job form; `tags` is the raw comma-separated input
#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub experience: String,
    pub tags: String,
    pub description: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<()> {
        forms::require(&self.title, "Please enter job title")?;
        forms::require(&self.company, "Please enter company name")?;
        forms::require(&self.location, "Please enter location")?;
        forms::require(&self.employment_type, "Please select employment type")?;
        forms::require(&self.experience, "Please enter experience")?;
        if forms::split_tags(&self.tags).is_empty() {
            return Err(ClientError::validation("Please enter tags"));
        }
        forms::require(&self.description, "Please enter job description")
    }

    fn to_request(&self) -> CreateJobRequest<'_> {
        CreateJobRequest {
            title: self.title.trim(),
            company: self.company.trim(),
            location: self.location.trim(),
            employment_type: self.employment_type.trim(),
            experience: self.experience.trim(),
            tags: forms::split_tags(&self.tags),
            description: &self.description,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobRequest<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    employment_type: &'a str,
    experience: &'a str,
    tags: Vec<String>,
    /// Rich text, sent as-is
    description: &'a str,
}

/// Job postings collection
#[derive(Clone)]
pub struct Jobs {
    collection: Collection,
}

impl Jobs {
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self {
            collection: Collection::new(Entity::Jobs, client),
        }
    }

    pub fn state(&self) -> CollectionState {
        self.collection.state()
    }

    pub fn kind(&self) -> SessionKind {
        self.collection.kind()
    }

    pub async fn fetch(&self) -> Result<Vec<Value>> {
        self.collection.fetch().await
    }

    pub async fn ensure_loaded(&self) -> Result<Vec<Value>> {
        self.collection.ensure_loaded().await
    }

    /// Publish a job posting
    pub async fn create(&self, form: &NewJob) -> Result<Value> {
        form.validate()?;

        let body = serde_json::to_value(form.to_request())
            .map_err(|e| ClientError::validation(e.to_string()))?;

        self.collection
            .mutate(MutationRequest {
                mutation: Mutation::Create,
                method: Method::POST,
                path: Entity::Jobs.path().to_string(),
                body: &body,
                failure: "Failed to create job",
                apply: Apply::Prepend,
                echo: None,
            })
            .await
    }

    /// Block or unblock a posting
    pub async fn set_blocked(&self, id: &str, blocked: bool) -> Result<Value> {
        forms::require(id, "Select a job first")?;

        let body = json!({ "blocked": blocked });

        self.collection
            .mutate(MutationRequest {
                mutation: Mutation::UpdateStatus,
                method: Method::PATCH,
                path: format!("{}/{}/block", Entity::Jobs.path(), id),
                body: &body,
                failure: "Failed to update job status",
                apply: Apply::Merge(id.to_string()),
                // Merged into the listed record found by the path id
                echo: Some(json!({ "blocked": blocked })),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_job() -> NewJob {
        NewJob {
            title: "Backend Engineer".to_string(),
            company: "Aspire".to_string(),
            location: "Remote".to_string(),
            employment_type: "Full-time".to_string(),
            experience: "5+ years".to_string(),
            tags: "Rust, Tokio, ".to_string(),
            description: "<p>Build things</p>".to_string(),
        }
    }

    #[test]
    fn test_job_body_is_camel_case_with_split_tags() {
        let job = valid_job();
        assert!(job.validate().is_ok());

        let body = serde_json::to_value(job.to_request()).unwrap();
        assert_eq!(body["employmentType"], "Full-time");
        assert_eq!(body["tags"], json!(["Rust", "Tokio"]));
        assert_eq!(body["description"], "<p>Build things</p>");
        assert!(body.get("employment_type").is_none());
    }

    #[test]
    fn test_blank_tags_are_rejected() {
        let job = NewJob {
            tags: " , ,".to_string(),
            ..valid_job()
        };
        assert_eq!(job.validate().unwrap_err().to_string(), "Please enter tags");
    }

    #[test]
    fn test_description_is_required() {
        let job = NewJob {
            description: String::new(),
            ..valid_job()
        };
        assert_eq!(
            job.validate().unwrap_err().to_string(),
            "Please enter job description"
        );
    }
}
