//! # Pokshin Shared
//!
//! Wire types between the archive server and its clients.
//! Kept free of domain dependencies so a client can compile it alone.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
