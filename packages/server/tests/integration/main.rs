mod common;

mod admin;
mod auth;
mod insights;
mod scan;
mod supply_chain;
