// src/config.rs

use std::env;

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: String,
    pub export_dir: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "db".to_string()),
            export_dir: env::var("EXPORT_DIR").unwrap_or_else(|_| "out".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
