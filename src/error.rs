// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by the carving core.
//!
//! Every stage fails fast: a malformed shape, a seam that does not fit
//! the image, or a pair of tables that disagree is reported to the
//! caller immediately, and no partial result is ever returned.

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, SeamError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SeamError {
    /// Zero-sized, non-rectangular, or dimensionally inconsistent input.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A seam whose length or column indices don't fit the target.
    #[error("invalid seam: {0}")]
    InvalidSeam(String),

    /// Cost and backpointer tables of different dimensions.
    #[error("inconsistent tables: cost is {cost:?}, backpointers are {backpointers:?}")]
    InconsistentTable {
        cost: (usize, usize),
        backpointers: (usize, usize),
    },
}

impl SeamError {
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    pub fn seam(msg: impl Into<String>) -> Self {
        Self::InvalidSeam(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(SeamError::shape("x").to_string().starts_with("invalid shape:"));
        assert!(SeamError::seam("x").to_string().starts_with("invalid seam:"));
        let e = SeamError::InconsistentTable {
            cost: (3, 4),
            backpointers: (4, 3),
        };
        assert_eq!(
            e.to_string(),
            "inconsistent tables: cost is (3, 4), backpointers are (4, 3)"
        );
    }
}
