//! Low-level MuPDF wrapper
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. `SafeDocument` keeps the owned
//! PDF bytes, opens a fresh document for every operation and serializes
//! access through a mutex, so it can be moved into `spawn_blocking` tasks.

mod safe;

pub use safe::SafeDocument;
