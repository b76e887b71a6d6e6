// src/api/domjudge.rs

//! DOMjudge API client.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::api::{random_suffix, PublishTarget};
use crate::error::{AppError, Result};
use crate::models::DomjudgeCredentials;

#[derive(Debug, Serialize)]
struct AddData {
    id: String,
    label: String,
    name: String,
}

/// Production [`PublishTarget`] backed by a DOMjudge server.
pub struct DomjudgeApi {
    client: reqwest::Client,
    server: Url,
    username: String,
    password: String,
    contest_id: String,
}

impl DomjudgeApi {
    pub fn new(credentials: &DomjudgeCredentials) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            server: Url::parse(&credentials.server)?,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            contest_id: credentials.contest_id.clone(),
        })
    }

    fn contest_url(&self, suffix: &str) -> Result<Url> {
        let path = format!("/api/v4/contests/{}/{suffix}", self.contest_id);
        Ok(self.server.join(&path)?)
    }

    async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::api(
                "domjudge",
                format!("POST {url} returned status {status}: {body}"),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl PublishTarget for DomjudgeApi {
    async fn register(&self, label: &str, name: &str) -> Result<String> {
        let external_id = format!("{label}-{name}-{}", random_suffix());
        let payload = serde_yaml::to_string(&vec![AddData {
            id: external_id.clone(),
            label: label.to_string(),
            name: name.to_string(),
        }])?;

        let form = reqwest::multipart::Form::new().part(
            "data",
            reqwest::multipart::Part::text(payload)
                .file_name("add-data.yaml")
                .mime_str("application/x-yaml")
                .map_err(|e| AppError::api("domjudge", e))?,
        );
        self.post_multipart(self.contest_url("problems/add-data")?, form)
            .await?;
        Ok(external_id)
    }

    async fn upload(&self, remote_id: &str, package: Vec<u8>) -> Result<()> {
        let form = reqwest::multipart::Form::new()
            .text("problem", remote_id.to_string())
            .part(
                "zip",
                reqwest::multipart::Part::bytes(package)
                    .file_name(format!("{remote_id}.zip"))
                    .mime_str("application/zip")
                    .map_err(|e| AppError::api("domjudge", e))?,
            );
        let response = self
            .post_multipart(self.contest_url("problems")?, form)
            .await?;

        let body: serde_json::Value = response.json().await?;
        if body.get("problem_id").is_none() {
            return Err(AppError::api(
                "domjudge",
                format!("upload response carries no problem_id: {body}"),
            ));
        }
        Ok(())
    }
}
