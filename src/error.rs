use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for ability invocations.
///
/// Every variant maps to a machine-readable [`ErrorKind`], a finer-grained
/// [`code`](AbilityError::code) and an advisory transport status hint. Handlers pick the variant (and therefore the hint);
/// the dispatcher only forwards it.
#[derive(Debug, Error)]
pub enum AbilityError {
    // ── Input contract ──────────────────────────────────────────────────
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    // ── Authorization ───────────────────────────────────────────────────
    #[error("permission denied: {ability} requires the `{capability}` capability")]
    PermissionDenied { ability: String, capability: String },

    // ── Referenced entity absent ────────────────────────────────────────
    #[error("{0}")]
    NotFound(String),

    // ── Store refused the operation ─────────────────────────────────────
    #[error("{0}")]
    Conflict(String),

    // ── Media ingestion ─────────────────────────────────────────────────
    #[error("{0}")]
    Ingestion(#[from] IngestionError),

    // ── Unexpected store failure ────────────────────────────────────────
    #[error("internal: {0}")]
    Internal(String),
}

/// Machine-readable error category carried on every failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    PermissionDenied,
    NotFound,
    Conflict,
    IngestionError,
    InternalError,
}

impl AbilityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Ingestion(_) => ErrorKind::IngestionError,
            Self::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Snake-case code naming the exact failure, e.g. `missing_field` or
    /// `download_failed`. Stable across message rewording.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(inner) => inner.into(),
            Self::PermissionDenied { .. } => "permission_denied",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Ingestion(inner) => inner.into(),
            Self::Internal(_) => "internal_error",
        }
    }

    /// Advisory HTTP-like status for transports that want one.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::PermissionDenied { .. } => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::Internal(_) => 500,
            Self::Ingestion(inner) => inner.status_hint(),
        }
    }
}

// ─── Validation errors ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValidationError {
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("field `{field}` must be of type {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` must be one of [{}], got `{value}`", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("field `{field}` is out of range: {value} (allowed {bounds})")]
    OutOfRange {
        field: String,
        value: i128,
        bounds: String,
    },

    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` has an invalid format: {message}")]
    InvalidFormat { field: String, message: String },
}

impl ValidationError {
    /// Dotted path of the offending field, `""` for the input root.
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field }
            | Self::TypeMismatch { field, .. }
            | Self::InvalidEnumValue { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::MissingField { field }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

// ─── Media ingestion errors ──────────────────────────────────────────────────

#[derive(Debug, Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum IngestionError {
    #[error("Use either base64 or url, not both.")]
    AmbiguousSource,

    #[error("Either base64 or url must be provided.")]
    #[strum(serialize = "no_image_data")]
    MissingSource,

    #[error("Invalid base64 data: {0}")]
    #[strum(serialize = "invalid_base64")]
    InvalidEncoding(String),

    #[error("Failed to download image: {0}")]
    #[strum(serialize = "download_failed")]
    Download(String),

    #[error("Image data is empty.")]
    #[strum(serialize = "empty_image")]
    EmptyPayload,

    #[error("media payload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to save file: {0}")]
    #[strum(serialize = "save_failed")]
    StorageWrite(String),

    #[error("upload directory unavailable: {0}")]
    #[strum(serialize = "upload_dir_unavailable")]
    UploadDir(String),

    #[error("Invalid file type: {0}")]
    #[strum(serialize = "invalid_filetype")]
    InvalidFileType(String),
}

impl IngestionError {
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::StorageWrite(_) | Self::UploadDir(_) => 500,
            Self::TooLarge { .. } => 413,
            _ => 400,
        }
    }
}

// ─── Content store errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("backend: {0}")]
    Backend(String),
}

impl StoreError {
    /// Replace a store-level not-found with the caller-facing message.
    pub fn or_not_found(self, message: &str) -> AbilityError {
        match self {
            Self::NotFound { .. } => AbilityError::NotFound(message.to_string()),
            other => other.into(),
        }
    }
}

impl From<StoreError> for AbilityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => Self::NotFound(format!("{kind} {id} not found")),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Backend(message) => Self::Internal(message),
        }
    }
}

// ─── Registry errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("ability {id} is already registered")]
    DuplicateAbility { id: String },

    #[error("ability category {slug} is already registered")]
    DuplicateCategory { slug: String },

    #[error("ability {id} references unknown category {category}")]
    UnknownCategory { id: String, category: String },

    #[error("ability {id} registered before category registration completed")]
    CategoriesPending { id: String },

    #[error("category {slug} registered after ability registration began")]
    CategoriesClosed { slug: String },

    #[error("registry cannot be sealed before ability registration began")]
    NotReady,

    #[error("a global ability registry is already installed")]
    AlreadyInstalled,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for ability execution.
pub type Result<T> = std::result::Result<T, AbilityError>;
