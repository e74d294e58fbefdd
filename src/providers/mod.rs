//! External data providers.
//!
//! - [`store`] - the remote complaint table store (Supabase) and an in-memory stand-in

pub mod store;
