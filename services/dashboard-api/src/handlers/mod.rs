//! HTTP handlers

mod auth;
mod deals;
mod health;
mod sheets;

pub use auth::{callback, login, logout, me};
pub use deals::{create_deal, deal_summary, delete_deal, list_deals, update_deal};
pub use health::{health, ready};
pub use sheets::{get_sheet_clients, get_sheet_data};
