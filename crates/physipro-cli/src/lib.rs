//! # PhysiPro CLI
//!
//! Operator tooling that works without a running service:
//!
//! - [`admin`]: Build the bootstrap administrator record
//! - [`seeder`]: Generate demo trainers and students
//! - [`tokens`]: Issue and inspect access tokens
//!
//! Records are printed as JSON in the same shape the service stores, so
//! they can be loaded into whatever store backs a deployment.

pub mod admin;
pub mod seeder;
pub mod tokens;
