pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod feed;
pub mod http_client;
pub mod model;
pub mod rankings;
pub mod report;
pub mod scan;
pub mod sofascore_fetch;
pub mod state;
