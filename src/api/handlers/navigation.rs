use axum::extract::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::path::PathBuf;
use tokio::process::Command;

use crate::{
    entities::Tag,
    error::{invalid_input_error, io_error, Error},
};

// The frontend sends tags either as "key=value" strings or as
// {"key": ..., "value": ...} objects; both normalize to the comma-joined
// string the navigate binary consumes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagSpec {
    Pair(Tag),
    Text(String),
}

// Some clients JSON-encode the whole list into a single string field.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<TagSpec>),
    Raw(String),
}

impl Default for TagsField {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl TagsField {
    pub fn normalized(&self) -> Result<String, Error> {
        match self {
            TagsField::List(specs) => Ok(tag_string(specs)),
            TagsField::Raw(raw) => {
                let specs: Vec<TagSpec> =
                    serde_json::from_str(raw).map_err(|_| invalid_input_error())?;

                Ok(tag_string(&specs))
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunParams {
    #[serde(default)]
    tags: TagsField,
}

pub fn tag_string(tags: &[TagSpec]) -> String {
    tags.iter()
        .map(|spec| match spec {
            TagSpec::Pair(tag) => tag.to_string(),
            TagSpec::Text(text) => text.clone(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

// The pipeline binary is installed next to the server executable.
fn navigate_binary() -> Result<PathBuf, Error> {
    let exe = env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| io_error("server executable has no parent directory"))?;

    Ok(dir.join("navigate"))
}

pub async fn run(
    Json(params): Json<RunParams>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let tag_str = params.tags.normalized()?;

    tracing::info!(tags = %tag_str, "spawning navigation pipeline");

    let output = Command::new(navigate_binary()?)
        .arg("--tags")
        .arg(&tag_str)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::error!(%stderr, "navigation pipeline failed");

        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": stderr.trim() })),
        ));
    }

    // The pipeline's last stdout line is the JSON run report; a no-op run
    // (no tags, no POIs) prints nothing.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| serde_json::from_str::<Value>(line).ok());

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "report": report })),
    ))
}

#[test]
fn accepts_tags_as_strings() {
    let params: RunParams =
        serde_json::from_str(r#"{"tags": ["amenity=cafe", "tourism=museum"]}"#).unwrap();
    assert_eq!(
        params.tags.normalized().unwrap(),
        "amenity=cafe,tourism=museum"
    );
}

#[test]
fn accepts_tags_as_key_value_objects() {
    let params: RunParams =
        serde_json::from_str(r#"{"tags": [{"key": "amenity", "value": "cafe"}]}"#).unwrap();
    assert_eq!(params.tags.normalized().unwrap(), "amenity=cafe");
}

#[test]
fn accepts_mixed_tag_shapes() {
    let params: RunParams = serde_json::from_str(
        r#"{"tags": ["amenity=cafe", {"key": "tourism", "value": "museum"}]}"#,
    )
    .unwrap();
    assert_eq!(
        params.tags.normalized().unwrap(),
        "amenity=cafe,tourism=museum"
    );
}

#[test]
fn accepts_tags_as_json_encoded_string() {
    let params: RunParams =
        serde_json::from_str(r#"{"tags": "[\"amenity=cafe\", \"tourism=museum\"]"}"#).unwrap();
    assert_eq!(
        params.tags.normalized().unwrap(),
        "amenity=cafe,tourism=museum"
    );
}

#[test]
fn rejects_undecodable_string_tags() {
    let params: RunParams = serde_json::from_str(r#"{"tags": "not json"}"#).unwrap();
    assert!(params.tags.normalized().is_err());
}

#[test]
fn missing_tags_default_to_empty() {
    let params: RunParams = serde_json::from_str("{}").unwrap();
    assert_eq!(params.tags.normalized().unwrap(), "");
}
