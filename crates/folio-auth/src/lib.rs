//! # folio-auth
//!
//! Request authorization for the Folio admin area.
//!
//! A protected request flows through:
//!
//! 1. [`session::SessionCookies`]: a per-request snapshot of the inbound
//!    cookies plus a buffer of pending cookie writes.
//! 2. [`resolver::SessionResolver`]: decodes the session cookie, refreshes
//!    it with the auth backend when it is about to expire, and asks the
//!    backend for the verified user.
//! 3. [`policy::AuthorizationPolicy`]: reads the user's admin flag.
//! 4. [`gate::RequestGate`]: runs 2 and 3 in order and yields an
//!    [`gate::AuthorizationDecision`] that always carries the pending
//!    cookie writes.
//! 5. [`relay::apply`]: writes those cookies onto whichever response is
//!    finally returned.

pub mod backend;
pub mod cookie;
pub mod gate;
pub mod matcher;
pub mod pkce;
pub mod policy;
pub mod relay;
pub mod resolver;
pub mod session;

pub use backend::{AuthBackend, AuthorizeRequest, BackendError, BackendUser, GoTrueClient};
pub use cookie::{CookieMutation, CookieOptions};
pub use gate::{AuthorizationDecision, RequestGate};
pub use matcher::{ProtectedRoutes, Surface};
pub use policy::{AuthorizationPolicy, PolicyLookupFailed, ProfileLookup};
pub use resolver::{Identity, IdentityResolver, Resolution, ResolveError, SessionResolver};
pub use session::{CodecError, RequestCookies, SessionCookieCodec, SessionCookies, StoredSession};
