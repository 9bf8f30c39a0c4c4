pub mod detection;
pub mod filename;
pub mod metadata;
pub mod pipeline;
pub mod source;
pub mod storage;
pub mod types;

pub use pipeline::MediaIngestionPipeline;
pub use storage::{LocalMediaStorage, MediaStorage};
pub use types::{IngestedMedia, MediaConfig, MediaType, UploadRequest};
