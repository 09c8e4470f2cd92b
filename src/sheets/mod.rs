pub mod auth;
pub mod client;

pub use auth::{AccessToken, ServiceAccount};
pub use client::{SheetsClient, Spreadsheet};
