//! Optional construction parameters for a certificate authority.
//!
//! Options are plain values applied in order to a [`CaOptions`] accumulator,
//! so new parameters can be added without touching the entry points.
//!
//! ```
//! use rootca::cert::options::{CaOptions, PathLenConstraint, with_pathlen_option};
//!
//! let options = CaOptions::from_options([with_pathlen_option(0, false)]);
//! assert_eq!(options.path_len, PathLenConstraint::Bounded(0));
//! ```

/// The path length limit requested for the CA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathLenConstraint {
    /// No path length option was given.
    #[default]
    Unspecified,
    /// Explicitly no limit on intermediate CAs.
    Unbounded,
    /// At most this many intermediate CAs below the root. `0` allows leaf
    /// certificates only.
    Bounded(u8),
}

impl PathLenConstraint {
    /// The value written to `pathLenConstraint`, if any.
    ///
    /// `Unspecified` and `Unbounded` both leave the field out; X.509 has no
    /// way to tell them apart.
    pub fn path_len_constraint(self) -> Option<u8> {
        match self {
            PathLenConstraint::Bounded(n) => Some(n),
            PathLenConstraint::Unspecified | PathLenConstraint::Unbounded => None,
        }
    }

    /// The limit as a signed integer, `-1` meaning unlimited.
    pub fn max_path_len(self) -> i32 {
        self.path_len_constraint().map(i32::from).unwrap_or(-1)
    }
}

/// Accumulated optional parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaOptions {
    pub path_len: PathLenConstraint,
}

impl CaOptions {
    /// Applies `options` in order to the defaults. Later options overwrite
    /// earlier ones that set the same field.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = CaOption>,
    {
        let mut accumulated = CaOptions::default();
        for option in options {
            option.apply(&mut accumulated);
        }
        accumulated
    }
}

impl FromIterator<CaOption> for CaOptions {
    fn from_iter<I: IntoIterator<Item = CaOption>>(iter: I) -> Self {
        Self::from_options(iter)
    }
}

/// One optional parameter, see [`with_pathlen_option`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaOption {
    PathLen(PathLenConstraint),
}

impl CaOption {
    pub fn apply(self, options: &mut CaOptions) {
        match self {
            CaOption::PathLen(path_len) => options.path_len = path_len,
        }
    }
}

/// Sets the path length constraint.
///
/// With `exclude` the limit is explicitly removed and `value` is ignored.
/// Otherwise `value` is the limit, `0` included.
pub fn with_pathlen_option(value: u8, exclude: bool) -> CaOption {
    if exclude {
        CaOption::PathLen(PathLenConstraint::Unbounded)
    } else {
        CaOption::PathLen(PathLenConstraint::Bounded(value))
    }
}
