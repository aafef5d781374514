pub mod store;
pub mod rds;
pub mod window;
pub mod selector;

pub use store::{LogPortion, LogStore};
pub use rds::RdsLogStore;
pub use window::{DownloadWindow, WindowBound};
pub use selector::{DownloadReport, download_files, download_window, select_files};
