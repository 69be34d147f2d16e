/// Authentication and authorization for Taskdeck
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed stateless tokens (JWT, HS256)
/// - [`session`]: in-process session table with TTL eviction
/// - [`authenticator`]: the strategy trait tying the two together
/// - [`authorization`]: the role guard and per-operation policy table
///
/// # Flow
///
/// Inbound request → [`authenticator::Authenticator::resolve`] produces an
/// [`authenticator::Identity`] (or 401) → [`authorization::check`] compares the
/// identity's role against the operation's minimum role (or 403) → the handler
/// touches the resource graph. The guard never runs for unauthenticated
/// requests.

pub mod authenticator;
pub mod authorization;
pub mod password;
pub mod session;
pub mod token;
