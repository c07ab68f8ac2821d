//! Middleware composed around dispatcher handlers.
//!
//! [`Logger`], [`Errors`] and [`Panics`] form the application chain every
//! route runs through. [`Cors`] is attached per route.

mod cors;
mod errors;
mod logger;
mod panics;

pub use cors::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_MAX_AGE, Cors, preflight};
pub use errors::Errors;
pub use logger::Logger;
pub use panics::{Panics, install_panic_hook};
