//! Page size and page request primitives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`PageSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageSizeError {
    /// Page size was zero.
    #[error("page size must be greater than zero")]
    Zero,
    /// Page size exceeded [`PageSize::MAX`].
    #[error("page size must not exceed {max}, got {got}")]
    TooLarge {
        /// Largest accepted page size.
        max: u32,
        /// Rejected value.
        got: u32,
    },
}

/// Number of items requested per page.
///
/// ## Invariants
/// - The value lies within `1..=PageSize::MAX`.
///
/// # Examples
/// ```
/// use pagination::PageSize;
///
/// assert_eq!(PageSize::default().get(), 10);
/// assert!(PageSize::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Page size used by every list screen unless configured otherwise.
    pub const DEFAULT: Self = Self(10);
    /// Largest page size accepted by the list endpoints.
    pub const MAX: u32 = 100;

    /// Validate and wrap a raw page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError`] when `value` is zero or above [`PageSize::MAX`].
    pub const fn new(value: u32) -> Result<Self, PageSizeError> {
        if value == 0 {
            return Err(PageSizeError::Zero);
        }
        if value > Self::MAX {
            return Err(PageSizeError::TooLarge {
                max: Self::MAX,
                got: value,
            });
        }
        Ok(Self(value))
    }

    /// Raw page size.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether a page of `returned` items implies another page may follow.
    ///
    /// A full page keeps pagination open even when it happens to be the last
    /// one; only a short page closes it.
    #[must_use]
    pub fn is_full_page(self, returned: usize) -> bool {
        usize::try_from(self.0).is_ok_and(|size| returned >= size)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// Page cursor sent to list endpoints.
///
/// Serialises as `{ "page": 0, "page_size": 10 }` so adapters can flatten it
/// into request bodies next to the session token and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Requested number of items.
    pub page_size: PageSize,
}

impl PageRequest {
    /// First page for the given size.
    #[must_use]
    pub const fn first(page_size: PageSize) -> Self {
        Self { page: 0, page_size }
    }
}
