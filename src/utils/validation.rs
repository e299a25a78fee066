use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of leading bytes inspected when classifying an upload by content.
pub const MIME_SNIFF_LEN: usize = 2048;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const WHOLE_NUMBER_MESSAGE: &str = "Enter a whole number.";

/// Field name -> messages, serialized as the `error` payload of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                out.add(field.as_ref(), message);
            }
        }
        out
    }
}

/// Validates upload size against the configured maximum.
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), String> {
    if size > max_size {
        return Err(format!(
            "File too large. Maximum size is {}MB",
            format_megabytes(max_size)
        ));
    }
    Ok(())
}

/// Megabytes as a float that always shows a fraction: `20.0`, `0.5`.
fn format_megabytes(bytes: usize) -> String {
    let mb = bytes as f64 / 1_048_576.0;
    if mb.fract() == 0.0 {
        format!("{:.1}", mb)
    } else {
        format!("{}", mb)
    }
}

/// Classifies data by its leading bytes and returns the MIME type only when it
/// names an image format. Filenames are never consulted.
pub fn sniff_image_mime(data: &[u8]) -> Option<&'static str> {
    let head = &data[..data.len().min(MIME_SNIFF_LEN)];
    infer::get(head)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
}

/// Builds the download name `{base}_compressed_{quality}.jpg` for an upload.
pub fn compressed_filename(original: &str, quality: u8) -> String {
    format!("{}_compressed_{}.jpg", base_name(original), quality)
}

/// Final path component with its last extension removed, made safe for a
/// quoted `Content-Disposition` filename.
fn base_name(original: &str) -> String {
    let name = original.rsplit(['/', '\\']).next().unwrap_or("");

    // A leading dot marks a hidden name, not an extension
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if !c.is_ascii()
                || c.is_ascii_control()
                || c == '"'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .take(200)
        .collect();

    if sanitized.trim().is_empty() {
        "image".to_string()
    } else {
        sanitized
    }
}
