//! Status Tool
//!
//! Runtime status of the service; doubles as the health check.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::resolve::CacheStats;

/// Service status
#[derive(Debug, Serialize)]
pub struct NutriscanStatus {
    pub status: &'static str,

    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Detector model whose labels are being resolved
    pub model: String,
    pub food_database: String,

    /// Feedback database
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub cache: CacheStats,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    model_name: String,
    food_database: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, model_name: String, food_database: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            model_name,
            food_database,
        }
    }

    pub fn get_status(&self, cache: CacheStats) -> NutriscanStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriscanStatus {
            status: "ok",
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            model: self.model_name.clone(),
            food_database: self.food_database.clone(),
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            cache,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
