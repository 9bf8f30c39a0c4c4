use super::types::MediaType;
use crate::error::IngestionError;

const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
    ("heic", "image/heic"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("zip", "application/zip"),
];

#[must_use]
pub fn detect_mime(data: &[u8]) -> Option<String> {
    infer::get(data).map(|info| info.mime_type().to_string())
}

#[must_use]
pub fn detect_mime_from_extension(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Whether `mime` matches an allow-list of exact types and `type/*` wildcards.
#[must_use]
pub fn is_allowed(mime: &str, allowed: &[String]) -> bool {
    let Ok(parsed) = mime.parse::<mime::Mime>() else {
        return false;
    };
    allowed
        .iter()
        .filter_map(|entry| entry.parse::<mime::Mime>().ok())
        .any(|entry| {
            if entry.subtype() == mime::STAR {
                entry.type_() == parsed.type_()
            } else {
                entry.essence_str() == parsed.essence_str()
            }
        })
}

/// Decide the stored file's type from its name.
///
/// The extension must map to an allowed type. When the content's magic bytes
/// are recognized they must agree with the extension's media category.
pub fn check_file_type(
    filename: &str,
    data: &[u8],
    allowed: &[String],
) -> Result<&'static str, IngestionError> {
    let Some(mime) = detect_mime_from_extension(filename) else {
        return Err(IngestionError::InvalidFileType(format!(
            "{filename} has no recognized extension"
        )));
    };
    if !is_allowed(mime, allowed) {
        return Err(IngestionError::InvalidFileType(format!(
            "{mime} uploads are not allowed"
        )));
    }
    if let Some(sniffed) = detect_mime(data)
        && MediaType::from_mime(&sniffed) != MediaType::from_mime(mime)
    {
        return Err(IngestionError::InvalidFileType(format!(
            "content is {sniffed} but the name says {mime}"
        )));
    }
    Ok(mime)
}
