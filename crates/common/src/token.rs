use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of every issued session token
pub const TOKEN_LEN: usize = 20;

/// Generate a session token of [`TOKEN_LEN`] characters drawn uniformly from
/// `[0-9A-Za-z]`.
///
/// Uniqueness is enforced by the store, not here.
pub fn generate_token() -> String {
    generate_alphanumeric(TOKEN_LEN)
}

/// Random `[0-9A-Za-z]` string of the given length
pub fn generate_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
