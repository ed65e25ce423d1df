//! HTTP request handlers

pub mod health;
pub mod organisers;
pub mod partners;
pub mod polls;
pub mod tasks;
pub mod webhooks;
