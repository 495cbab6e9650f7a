pub mod archive;
pub mod download;
pub mod process;
pub mod steam;

pub use download::DownloadClient;
