pub mod session;

pub use session::{RequireSession, SESSION_COOKIE};
