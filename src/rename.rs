//! Output renamings.

use std::fmt;
use std::str::FromStr;

/// A request to write the symbol named `from` as `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl FromStr for Rename {
    type Err = ParseRenameError;

    /// Parses a renaming written as `old=new`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fortran_unparse::rename::Rename;
    /// #
    /// let rename: Rename = "x=x$1".parse().unwrap();
    ///
    /// assert_eq!(rename.from, "x");
    /// assert_eq!(rename.to, "x$1");
    /// assert!("x".parse::<Rename>().is_err());
    /// assert!("=y".parse::<Rename>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s.split_once('=').ok_or(ParseRenameError)?;
        let (from, to) = (from.trim(), to.trim());

        if from.is_empty() || to.is_empty() {
            return Err(ParseRenameError);
        }

        Ok(Rename {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct ParseRenameError;

impl fmt::Display for ParseRenameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid renaming, expected `old=new`")
    }
}
