#![deny(missing_docs)]

//! Core library for gistify: chunked, recursive summarization of long documents.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from supported document formats.
pub mod extraction;
/// Language detection and model language tags.
pub mod language;
/// Structured logging and tracing setup.
pub mod logging;
/// Summary metrics helpers.
pub mod metrics;
/// Chunking, normalization, and the reduction pipeline.
pub mod processing;
/// Summarization model client abstraction and the Ollama adapter.
pub mod summarization;
