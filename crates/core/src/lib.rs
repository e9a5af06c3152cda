#![deny(warnings)]

pub mod analytics;
pub mod app;
pub mod classify;
pub mod clock;
pub mod config;
pub mod export;
pub mod history;
pub mod mood;
pub mod reminder;
pub mod settings;
pub mod speech;
pub mod storage;
pub mod util;
