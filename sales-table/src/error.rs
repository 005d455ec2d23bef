use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    /// The "Order Date" column of the given record couldn't be parsed
    BadDate { record: u64, value: String },
    /// A whole number too large for its column
    OutOfRange {
        record: u64,
        column: &'static str,
        value: u64,
    },
    /// A name that isn't one of a closed set of choices (a category, a
    /// measure, a month...)
    Unknown {
        what: &'static str,
        value: String,
        expected: &'static [&'static str],
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Csv(e) => write!(f, "{}", e),
            Error::BadDate { record, value } => {
                write!(f, "Record {}: can't parse order date {:?}", record, value)
            }
            Error::OutOfRange {
                record,
                column,
                value,
            } => write!(f, "Record {}: {} {} is out of range", record, column, value),
            Error::Unknown {
                what,
                value,
                expected,
            } => write!(
                f,
                "Unknown {} {:?} (expected one of: {})",
                what,
                value,
                expected.join(", ")
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(x: std::io::Error) -> Error {
        Error::Io(x)
    }
}

impl From<csv::Error> for Error {
    fn from(x: csv::Error) -> Error {
        Error::Csv(x)
    }
}
