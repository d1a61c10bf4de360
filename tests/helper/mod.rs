#![allow(dead_code)]

pub mod client;
pub mod fixtures;

pub use client::{InfoCall, MockClient, RecordingHooks};
pub use fixtures::{adapter, environment, product, product_without_token};
