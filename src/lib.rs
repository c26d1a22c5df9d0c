pub mod app;
pub mod client;
pub mod commands;
pub mod config;
pub mod domain;
pub mod embed;
pub mod errors;
pub mod gallery;
pub mod handlers;
pub mod layout;
pub mod letter;
pub mod models;
pub mod render;
pub mod startup;
pub mod upload;

#[cfg(test)]
mod testing;
