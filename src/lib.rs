pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod view;
