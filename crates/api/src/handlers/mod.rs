pub mod download;
pub mod metadata;
pub mod progress;
pub mod translate;
