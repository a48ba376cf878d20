pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::Endpoint;
    pub use super::probe::{probe_call, probe_stream};
    pub use super::result::ProbeResult;
}

use std::fmt::Write;

/// The two probe variants offered by the system under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Synchronous endpoint, read as one buffered response.
    Call,
    /// Streaming endpoint, drained chunk by chunk.
    Stream,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Call => "call",
            Endpoint::Stream => "stream",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Call => "/cfg/call",
            Endpoint::Stream => "/cfg/stream",
        }
    }
}

/// Flattens an error and its source chain into a single line, so equal
/// failure causes land in the same bucket of the error frequency table.
fn describe_error(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn describe_error_walks_the_source_chain() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        let description = describe_error(&err);
        assert_eq!(description, "request failed: connection refused");
    }

    #[test]
    fn endpoint_names_match_their_paths() {
        assert_eq!(Endpoint::Call.path(), "/cfg/call");
        assert_eq!(Endpoint::Stream.path(), "/cfg/stream");
        assert_eq!(Endpoint::Call.name(), "call");
        assert_eq!(Endpoint::Stream.name(), "stream");
    }
}
