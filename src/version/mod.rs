//! Version-gated dispatch
//!
//! This module provides loose version comparison, criteria expressions, and
//! the registry and gates that pick an implementation per call based on a
//! version supplied by the caller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Gate     │────▶│  Registry   │────▶│  Criteria   │
//! │ (dispatch)  │     │ (overloads) │     │   (test)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │  ClassGate  │                         │    Loose    │
//! │(type guard) │                         │(version cmp)│
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`loose`]: dotted version values with field-wise ordering
//! - [`operator`]: comparison operators and their tokens
//! - [`criteria`]: parsing and testing criteria expressions
//! - [`registry`]: dispatch keys and the override table
//! - [`gate`]: version getter, gates and dispatchers for callables
//! - [`class_gate`]: gates for constructors and associated functions
//! - [`error`]: error types for parsing and checking

pub mod class_gate;
pub mod criteria;
pub mod error;
pub mod gate;
pub mod loose;
pub mod operator;
pub mod registry;
