//! Sign-in credentials.
//!
//! Users sign in with an e-mail address or a phone number. Credentials are
//! validated locally so a blank form never reaches the API, and phone numbers
//! are normalised so `+234 801-234-5678` and `+2348012345678` are the same
//! account.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

/// Sign-in form values that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginValidationError {
    /// Account was missing or blank once trimmed.
    #[error("account must not be empty")]
    EmptyAccount,
    /// Account is neither an e-mail address nor a phone number.
    #[error("account must be an e-mail address or a phone number")]
    UnrecognisedAccount,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Kind of identifier used to sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Contains `@`.
    Email,
    /// Digits with an optional leading `+`.
    Phone,
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `account` is trimmed; phone numbers keep only the leading `+` and digits.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use client::domain::LoginCredentials;
/// use client::domain::auth::AccountKind;
///
/// let creds = LoginCredentials::try_from_parts(" +234 801-234-5678 ", "hunter2").unwrap();
/// assert_eq!(creds.account(), "+2348012345678");
/// assert_eq!(creds.account_kind(), AccountKind::Phone);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    account: String,
    kind: AccountKind,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(account: &str, password: &str) -> Result<Self, LoginValidationError> {
        let (account, kind) = normalise_account(account)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            account,
            kind,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised e-mail address or phone number.
    pub fn account(&self) -> &str {
        self.account.as_str()
    }

    /// Whether the account is an e-mail address or a phone number.
    pub fn account_kind(&self) -> AccountKind {
        self.kind
    }

    /// Password exactly as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("account", &self.account)
            .field("kind", &self.kind)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn normalise_account(raw: &str) -> Result<(String, AccountKind), LoginValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LoginValidationError::EmptyAccount);
    }
    if trimmed.contains('@') {
        return Ok((trimmed.to_owned(), AccountKind::Email));
    }

    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };
    let separators = |c: char| c == ' ' || c == '-' || c == '(' || c == ')';
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || separators(c)) {
        return Err(LoginValidationError::UnrecognisedAccount);
    }
    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(LoginValidationError::UnrecognisedAccount);
    }
    Ok((format!("{plus}{digits}"), AccountKind::Phone))
}
