//! Data types for downloads, stories, extraction results, and configuration.

pub mod config;
pub mod download;
pub mod extraction;
