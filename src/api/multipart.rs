// src/api/multipart.rs
use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;
use tracing::debug;

use crate::{
    api::types::{PhotoSubmission, RequestParams},
    utils::error::{AppError, Result},
};

/// Bytes of the fields kept from a multipart body.
#[derive(Debug, Default)]
pub struct Fields {
    values: HashMap<String, Vec<u8>>,
    stored: usize,
    limit: usize,
}

impl Fields {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Appends a chunk to `name`. The limit covers everything stored across
    /// all fields of the request, not each field on its own.
    pub fn append(&mut self, name: &str, chunk: &[u8]) -> Result<()> {
        if self.stored + chunk.len() > self.limit {
            return Err(AppError::PayloadTooLarge { limit: self.limit });
        }
        self.stored += chunk.len();
        self.values.entry(name.to_string()).or_default().extend_from_slice(chunk);
        Ok(())
    }

    pub fn take_bytes(&mut self, name: &str) -> Option<Vec<u8>> {
        self.values.remove(name)
    }

    pub fn take_text(&mut self, name: &str) -> Result<Option<String>> {
        self.take_bytes(name)
            .map(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|_| AppError::MalformedPayload(format!("field `{}` is not valid UTF-8", name)))
            })
            .transpose()
    }

    pub fn take_params(&mut self) -> Result<RequestParams> {
        Ok(RequestParams {
            user_id: self.take_text("user_id")?,
            mission_id: self.take_text("mission_id")?,
        })
    }
}

/// Drains a multipart body, keeping only the fields named in `wanted`.
/// Other fields are read and discarded.
pub async fn read_fields(mut payload: Multipart, limit: usize, wanted: &[&str]) -> Result<Fields> {
    let mut fields = Fields::new(limit);

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_string();
        let keep = wanted.contains(&name.as_str());
        if !keep {
            debug!(field = %name, "Discarding unexpected multipart field");
        }

        while let Some(chunk) = field.try_next().await? {
            if keep {
                fields.append(&name, &chunk)?;
            }
        }
    }

    Ok(fields)
}

/// Reads a `/verify_exif` body. Ids missing from the body are taken from
/// `query`.
pub async fn read_submission(payload: Multipart, limit: usize, query: RequestParams) -> Result<PhotoSubmission> {
    let mut fields = read_fields(payload, limit, &["user_id", "mission_id", "file"]).await?;
    let params = fields.take_params()?.or(query);

    Ok(PhotoSubmission {
        user_id: params.user_id()?,
        mission_id: params.mission_id()?,
        file: fields
            .take_bytes("file")
            .ok_or_else(|| AppError::MalformedPayload("missing field `file`".into()))?,
    })
}
