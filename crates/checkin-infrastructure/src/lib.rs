pub mod config_service;
pub mod dto;
pub mod file_check_in_repository;
pub mod paths;
pub mod snapshot_repository;
mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_check_in_repository::FileCheckInRepository;
pub use crate::paths::CheckInPaths;
pub use crate::snapshot_repository::FileSessionSnapshotRepository;
