//! quizforge-core: question repository and practice/test engine.
//!
//! This crate owns the question store, answer checking, exposure-weighted
//! selection, and the practice and test sessions. Reading input and drawing
//! menus are left to the caller through the [`session::Responder`] trait.

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod repository;
pub mod results_log;
pub mod selector;
pub mod session;
pub mod statistics;

pub use error::{QuizError, Result};
