pub mod configuration;
pub mod domain;
pub mod error;
pub mod ghost_client;
pub mod signup;
pub mod startup;
pub mod storage;
pub mod telemetry;
pub mod ui;
