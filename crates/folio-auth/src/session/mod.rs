//! Session cookies: the per-request store adapter and the on-the-wire
//! encoding of the auth backend's session.

pub mod codec;
pub mod store;

pub use codec::{CodecError, SessionCookieCodec, StoredSession};
pub use store::{RequestCookies, SessionCookies};
