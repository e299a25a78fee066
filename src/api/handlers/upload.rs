use crate::AppState;
use crate::api::error::AppError;
use crate::config::CompressorConfig;
use crate::models::UploadOptions;
use crate::services::ImageCompressor;
use crate::utils::validation::{
    FieldErrors, REQUIRED_MESSAGE, WHOLE_NUMBER_MESSAGE, compressed_filename, validate_file_size,
};
use anyhow::Context;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

/// Multipart body accepted by `POST /upload`.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadRequest {
    #[schema(value_type = String, format = Binary)]
    pub image_file: Vec<u8>,
    #[schema(minimum = 1, maximum = 100, example = 80)]
    pub quality: u8,
    #[schema(example = "on")]
    pub preserve_exif: Option<String>,
    #[schema(example = "on")]
    pub auto_rotate: Option<String>,
}

pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Raw form fields, before validation.
#[derive(Default)]
pub struct UploadForm {
    pub image_file: Option<UploadedFile>,
    pub quality: Option<String>,
    pub preserve_exif: bool,
    pub auto_rotate: bool,
}

/// HTML checkbox semantics: absent is false, and so are the usual "off" spellings.
pub fn parse_checkbox(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "off" | "no"
    )
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "image_file" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await.map_err(multipart_error)?;
                    form.image_file = Some(UploadedFile { filename, data });
                }
                "quality" => {
                    form.quality = Some(field.text().await.map_err(multipart_error)?);
                }
                "preserve_exif" => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.preserve_exif = parse_checkbox(&value);
                }
                "auto_rotate" => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.auto_rotate = parse_checkbox(&value);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Checks every field and reports all failures together.
    pub fn validate(
        self,
        config: &CompressorConfig,
    ) -> Result<(UploadedFile, UploadOptions), FieldErrors> {
        let mut errors = FieldErrors::new();

        let file = match self.image_file {
            Some(file) if !file.data.is_empty() => {
                if let Err(message) = validate_file_size(file.data.len(), config.max_upload_size) {
                    errors.add("image_file", message);
                }
                Some(file)
            }
            _ => {
                errors.add("image_file", REQUIRED_MESSAGE);
                None
            }
        };

        let quality = match self.quality.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("quality", REQUIRED_MESSAGE);
                None
            }
            Some(text) => match text.parse::<i64>() {
                // Values that do not fit a u8 map to 0 so range validation rejects them
                Ok(value) => Some(u8::try_from(value).unwrap_or(0)),
                Err(_) => {
                    errors.add("quality", WHOLE_NUMBER_MESSAGE);
                    None
                }
            },
        };

        let options = quality.and_then(|quality| {
            UploadOptions::new(
                quality,
                self.preserve_exif,
                self.auto_rotate,
                config.max_dimension,
            )
            .map_err(|e| errors.merge(e.into()))
            .ok()
        });

        match (file, options) {
            (Some(file), Some(options)) if errors.is_empty() => Ok((file, options)),
            _ => Err(errors),
        }
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Compressed image as an image/jpeg attachment"),
        (status = 400, description = "Form validation failed or the upload is not a decodable image"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "Unexpected processing failure")
    ),
    tag = "images"
)]
pub async fn compress_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let (file, options) = form.validate(&state.config).map_err(AppError::Validation)?;

    let output_filename = compressed_filename(&file.filename, options.quality);
    info!(
        filename = %file.filename,
        size = file.data.len(),
        quality = options.quality,
        preserve_exif = options.preserve_exif,
        auto_rotate = options.auto_rotate,
        "Compressing upload"
    );

    let data = file.data;
    let job = tokio::task::spawn_blocking(move || ImageCompressor::compress(&data, &options));

    let result = match tokio::time::timeout(state.config.processing_timeout, job).await {
        Ok(joined) => joined.context("compression task failed")??,
        Err(_) => {
            return Err(AppError::Internal(format!(
                "compression exceeded the {:?} deadline",
                state.config.processing_timeout
            )));
        }
    };

    info!(
        output = %output_filename,
        width = result.final_width,
        height = result.final_height,
        compressed_size = result.compressed_size_bytes,
        "Upload compressed"
    );

    let content_disposition = format!("attachment; filename=\"{}\"", output_filename);
    Ok((
        [
            (header::CONTENT_TYPE, mime::IMAGE_JPEG.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition),
            (
                header::CONTENT_LENGTH,
                result.compressed_size_bytes.to_string(),
            ),
        ],
        Body::from(result.data),
    )
        .into_response())
}
