pub mod models;
pub mod password;
pub mod pnr;
pub mod seats;
pub mod session;

pub use session::{Identity, SessionContext};
