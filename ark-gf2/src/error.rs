use std::fmt;

/// A result type specialized to [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// An error that can occur while building or solving a GF(2) affine system.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An operand, shift amount, width, or constraint list was outside the
    /// domain an operation is defined on (e.g. AND of two non-constant
    /// expressions, a negative shift, an empty constraint list, or a
    /// non-positive width/length).
    Domain(String),
    /// Two operands were drawn from different [`LinearSystem`](crate::LinearSystem)s.
    CrossSystem,
    /// A bit or variable index was out of range.
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of valid indices (the index must be `< len`).
        len: usize,
    },
    /// The equation count or system width exceeded what the matrix
    /// collaborator can represent.
    Overflow(String),
    /// The constraint list is consistent-looking but has no solution: after
    /// elimination, some row reads `0…0 | 1`.
    Infeasible,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Domain(msg) => write!(f, "domain error: {msg}"),
            Error::CrossSystem => {
                write!(f, "operands belong to different linear systems")
            },
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (len = {len})")
            },
            Error::Overflow(msg) => write!(f, "overflow: {msg}"),
            Error::Infeasible => write!(f, "no solution"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Error::Domain(msg.into())
    }

    pub(crate) fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }
}
