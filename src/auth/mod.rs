//! Login credentials and the persisted session.
//!
//! - `Credentials`: validated username/password pair sent to the login endpoint
//! - `Session`: bearer token and shift of the logged-in user, stored on disk

pub mod credentials;
pub mod session;

pub use credentials::{Credentials, CredentialsError, InvalidCredentials};
pub use session::{Session, SessionData};
