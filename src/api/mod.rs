//! The gateway to the BMS backend REST API.

mod client;
mod envelope;
mod error;
mod multipart;
mod resource;

pub use client::{ApiClient, DEFAULT_API_URL, NotificationReceipt};
pub use envelope::ResponseBody;
pub use error::ApiError;
pub use multipart::UploadFile;
pub use resource::Resource;
