use std::fmt;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend(message.into()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Io(kind) => write!(f, "io error: {kind}"),
            ErrorKind::NotARepository => write!(f, "Not in a git repository"),
            ErrorKind::GitUnavailable => write!(f, "git is not installed or not in PATH"),
            ErrorKind::Backend(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
pub enum ErrorKind {
    Io(std::io::ErrorKind),
    NotARepository,
    GitUnavailable,
    Backend(String),
}
