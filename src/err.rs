
use std::{cmp, error, fmt, io};

/// Represents possible errors returned from Pythia
#[derive(Debug)]
pub enum Error {
    Interface(String),
    Server(i32, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Server(errcode, errmsg) => write!(f, "PYT-{:05}: {}", errcode, errmsg),
            Error::Interface(errmsg) => write!(f, "{}", errmsg),
        }
    }
}

impl error::Error for Error {}

impl cmp::PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        match (self, other) {
            (Error::Server(this_code, _), Error::Server(other_code, _)) => this_code == other_code,
            (Error::Interface(this_msg), Error::Interface(other_msg)) => this_msg == other_msg,
            _ => false,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

impl Error {
    pub(crate) fn new(msg: &str) -> Self {
        Error::Interface(msg.to_owned())
    }

    pub(crate) fn msg(msg: String) -> Self {
        Error::Interface(msg)
    }

    pub(crate) fn server(code: i32, msg: impl Into<String>) -> Self {
        Error::Server(code, msg.into())
    }

    /// Numeric code of a server-raised error, if this is one.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Server(code, _) => Some(*code),
            Error::Interface(_) => None,
        }
    }
}
