//! File transfer between clients, local staging, object storage and the metadata store.

mod disposition;
mod service;
mod staging;
mod upload;

pub use disposition::attachment_disposition;
pub use service::FileTransferService;
pub use upload::UploadedFile;
