//! Session domain
//!
//! Owns authentication identity and the phone-verification handshake. The
//! handshake is an explicit state machine: `Anonymous` until an OTP is
//! requested, `OtpPending` until the code verifies, then `Authenticated`.
//! The tourist and labour stores never mutate session state.

mod identity;
mod store;

pub use identity::{Identity, PhoneNumber, SessionStage, UserType};
pub use store::{SessionState, SessionStore};
