//! Profile, follow graph and account lifecycle operations. Each takes the
//! shared store client explicitly and maps store failures to [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod account;
pub mod profile;
pub mod social;
pub mod view;
