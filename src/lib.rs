pub mod archive;
pub mod config;
pub mod date_token;
pub mod server;

pub use archive::{
    probe_connection, ArchiveFetcher, FetchError, FixedRandom, HeaderProfile, ProbeReport,
    RandomSource, Table, TableSource, ThreadRandom,
};
pub use config::{ConfigError, DelayRange, FetchConfig, FetchMode};
pub use date_token::{DateToken, DateTokenError};
pub use server::{create_router, run_server, ApiError, AppState, ServerConfig};
