// src/lib.rs
pub mod announcement;
pub mod app;
pub mod errors;
pub mod event;
pub mod feed;
pub mod feed_fetch;
pub mod feed_push;
pub mod session;
pub mod ui;

pub mod widgets;
