pub mod catalog;
pub mod config;
pub mod errors;
pub mod imaging;
pub mod matching;
pub mod models;
pub mod web;
