//! Attachment blob storage adapters.

mod filesystem;

pub use filesystem::FilesystemBlobStore;
