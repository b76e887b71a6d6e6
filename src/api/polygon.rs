// src/api/polygon.rs

//! Polygon API client.
//!
//! Requests are form posts signed with the six-letter-nonce SHA-512 scheme
//! the Polygon API requires.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha512};

use crate::api::{random_suffix, PackageRef, PackageSource};
use crate::error::{AppError, Result};
use crate::models::PolygonCredentials;

const POLYGON_ADDRESS: &str = "https://polygon.codeforces.com/api/";

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    id: i64,
    revision: i64,
    state: String,
    #[serde(rename = "type")]
    kind: String,
}

/// One problem of a Polygon contest, as returned by `contest.problems`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContestProblem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
}

/// Production [`PackageSource`] backed by the Polygon API.
pub struct PolygonApi {
    client: reqwest::Client,
    key: String,
    secret: String,
}

impl PolygonApi {
    pub fn new(credentials: &PolygonCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            key: credentials.key.clone(),
            secret: credentials.secret.clone(),
        }
    }

    /// Sign and send one API call, returning the raw response.
    async fn call(
        &self,
        method: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<reqwest::Response> {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        params.push(("apiKey".to_string(), self.key.clone()));
        params.push(("time".to_string(), time.to_string()));

        let nonce = random_suffix();
        let mut sorted = params.clone();
        sorted.sort();
        let query = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let to_hash = format!("{nonce}/{method}?{query}#{}", self.secret);
        let signature = hex::encode(Sha512::digest(to_hash.as_bytes()));
        params.push(("apiSig".to_string(), format!("{nonce}{signature}")));

        let response = self
            .client
            .post(format!("{POLYGON_ADDRESS}{method}"))
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::api(
                "polygon",
                format!("{method} returned status {status}: {body}"),
            ));
        }
        Ok(response)
    }

    /// Send an API call and unwrap the `{status, result}` envelope.
    async fn call_json<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Vec<(String, String)>,
    ) -> Result<T> {
        let envelope: ApiResponse<T> = self.call(method, params).await?.json().await?;
        if envelope.status != "OK" {
            return Err(AppError::api(
                "polygon",
                format!(
                    "{method} failed: {}",
                    envelope.comment.unwrap_or_else(|| "no comment".to_string())
                ),
            ));
        }
        envelope.result.ok_or_else(|| {
            AppError::api("polygon", format!("{method} returned an empty result"))
        })
    }

    /// Problems of a Polygon contest, keyed by label.
    pub async fn contest_problems(
        &self,
        contest_id: u64,
    ) -> Result<BTreeMap<String, ContestProblem>> {
        self.call_json(
            "contest.problems",
            vec![("contestId".to_string(), contest_id.to_string())],
        )
        .await
    }
}

#[async_trait]
impl PackageSource for PolygonApi {
    async fn latest_package(&self, problem_id: u64) -> Result<Option<PackageRef>> {
        let packages: Vec<PackageInfo> = self
            .call_json(
                "problem.packages",
                vec![("problemId".to_string(), problem_id.to_string())],
            )
            .await?;
        Ok(packages
            .iter()
            .filter(|p| p.state == "READY" && p.kind == "linux")
            .max_by_key(|p| p.revision)
            .map(|p| PackageRef {
                revision: p.revision,
                package_id: p.id,
            }))
    }

    async fn download(&self, problem_id: u64, package: PackageRef) -> Result<Vec<u8>> {
        let response = self
            .call(
                "problem.package",
                vec![
                    ("problemId".to_string(), problem_id.to_string()),
                    ("packageId".to_string(), package.package_id.to_string()),
                    ("type".to_string(), "linux".to_string()),
                ],
            )
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
