//! # PhysiPro DB
//!
//! Persistence seam for user accounts.
//!
//! - [`repository`]: The [`UserRepository`] trait every store implements
//! - [`memory`]: [`InMemoryUserRepository`], a process-local store
//!
//! Services hold an `Arc<dyn UserRepository>`, so a relational store can be
//! swapped in without touching them.

pub mod memory;
pub mod repository;

pub use memory::InMemoryUserRepository;
pub use repository::{DynUserRepository, UserRepository};
