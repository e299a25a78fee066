use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::models::DEFAULT_MAX_DIMENSION;

/// Runtime configuration for the compression service
#[derive(Debug, Clone)]
pub struct CompressorConfig {
    /// Maximum accepted upload in bytes (default: 20 MB)
    pub max_upload_size: usize,

    /// Longest side of a compressed image in pixels (default: 3000)
    pub max_dimension: u32,

    /// Deadline for one compression job (default: 30 s)
    pub processing_timeout: Duration,

    /// Listen address (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 20 * 1024 * 1024, // 20 MB
            max_dimension: DEFAULT_MAX_DIMENSION,
            processing_timeout: Duration::from_secs(30),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl CompressorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            max_dimension: env::var("MAX_DIMENSION")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default.max_dimension),

            processing_timeout: env::var("PROCESSING_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.processing_timeout),

            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.bind_addr),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development (small uploads, short deadline)
    pub fn development() -> Self {
        Self {
            max_upload_size: 5 * 1024 * 1024,
            processing_timeout: Duration::from_secs(10),
            ..Self::default()
        }
    }

    pub fn max_upload_size_mb(&self) -> f64 {
        self.max_upload_size as f64 / 1_048_576.0
    }
}
