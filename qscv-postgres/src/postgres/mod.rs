pub mod options;
pub mod connection;

mod message;
mod stream;

pub use prelude::*;

pub mod prelude {
    pub use super::options::PgOptions;
    pub use super::connection::PgConnection;
}
