pub mod uploads;

pub use uploads::{StoredFile, UploadStore};
