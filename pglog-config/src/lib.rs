pub mod setting;
pub mod dbconfig;
pub mod loader;
pub mod download;

pub use setting::Settings;
pub use dbconfig::DbConfig;
pub use loader::LoaderConfig;
pub use download::DownloadConfig;
