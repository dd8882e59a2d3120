
// General Modules

// common utility which completely isolated
mod common;

// Driver
pub mod protocol;

// Runtime
mod net;

// Error
mod error;

// Postgres Specific
pub mod types;
pub mod encode;

// Postgres
pub mod value;

pub mod options;
pub mod connection;
pub mod statement;

pub mod message;
mod stream;


pub use self::error::{Error, Result};
pub use self::options::PgOptions;
pub use self::connection::PgConnection;

