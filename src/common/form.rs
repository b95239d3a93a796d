use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{multipart::Field, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
};
use futures_util::StreamExt;

use crate::common::response::ApiError;

/// A file part buffered from a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Form body read fully into memory, either `multipart/form-data` or
/// `application/x-www-form-urlencoded`.
///
/// Repeated text fields keep their first value. File parts are keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct MovieForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MovieForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.insert_field(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.entry(name.to_string()).or_insert(file);
        self
    }

    /// The field's value, `None` when it was not sent at all.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The field's value with absent treated as empty.
    pub fn value(&self, name: &str) -> &str {
        self.field(name).unwrap_or("")
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = Self::new();
        for (name, value) in url::form_urlencoded::parse(body) {
            form.insert_field(name.into_owned(), value.into_owned());
        }
        form
    }

    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError(e.body_text(), e.status()))?
        {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = read_field(field).await?;
                    form.files.entry(name).or_insert(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError(e.body_text(), e.status()))?;
                    form.insert_field(name, value);
                }
            }
        }

        Ok(form)
    }

    fn insert_field(&mut self, name: String, value: String) {
        self.fields.entry(name).or_insert(value);
    }
}

async fn read_field(mut field: Field<'_>) -> Result<Bytes, ApiError> {
    let mut buffer = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| ApiError(e.body_text(), e.status()))?;
        buffer.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buffer))
}

impl<S> FromRequest<S> for MovieForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError(e.body_text(), StatusCode::BAD_REQUEST))?;
            Self::from_multipart(multipart).await
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError(e.body_text(), StatusCode::BAD_REQUEST))?;
            Ok(Self::from_urlencoded(&body))
        }
    }
}

/// Decoded query string. Keeps every pair in order so repeated keys survive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self(pairs)
    }

    /// First value for `key`, empty when the key is absent.
    pub fn get(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}
