//! Domains module containing business logic organized by bounded contexts.
//!
//! The only domain so far is `folders`: browsing and creating directories
//! confined to the base directory.

pub mod folders;
