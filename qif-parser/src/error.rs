use std::error::Error;
use std::fmt;
use std::io;

use super::Rule;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// A numeric field (`T`, `$` or `B`) could not be converted to a decimal.
    DecimalError { code: char, value: String },
    /// An account field other than `N` appeared before any account was named.
    MissingAccount { code: char },
    /// Reading the input failed.
    Io { message: String },
    /// Parser has reached an invalid state (most likely a bug in the parser).
    InvalidParserState { message: String },
}

#[derive(Debug)]
pub struct ParseError {
    /// The type of error.
    pub kind: ParseErrorKind,
    /// The 1-based line of the input the error occurred on, or 0 if it is not tied to a line.
    pub line: usize,
    source: Option<Box<dyn Error + 'static + Send + Sync>>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::DecimalError { code, value } => {
                write!(f, "Invalid number {:?} in field '{}'", value, code)?;
            }
            ParseErrorKind::MissingAccount { code } => {
                write!(
                    f,
                    "Account field '{}' appears before any account name ('N' line)",
                    code
                )?;
            }
            ParseErrorKind::Io { message } => {
                write!(f, "Could not read input: {}", message)?;
            }
            ParseErrorKind::InvalidParserState { message } => {
                write!(f, "Parser has reached an invalid state (please report this as a bug): expected {}", message)?;
            }
        }
        if self.line > 0 {
            write!(f, " at line {}", self.line)?;
        }
        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl ParseError {
    pub(crate) fn invalid_state<T: ToString>(msg: T, line: usize) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidParserState {
                message: msg.to_string(),
            },
            line,
            source: None,
        }
    }

    pub(crate) fn decimal_parse_error(
        err: rust_decimal::Error,
        code: char,
        value: &str,
        line: usize,
    ) -> ParseError {
        ParseError {
            kind: ParseErrorKind::DecimalError {
                code,
                value: value.to_string(),
            },
            line,
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn missing_account(code: char, line: usize) -> ParseError {
        ParseError {
            kind: ParseErrorKind::MissingAccount { code },
            line,
            source: None,
        }
    }

    pub(crate) fn io_error(err: io::Error, line: usize) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Io {
                message: err.to_string(),
            },
            line,
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn with_line(mut self, line: usize) -> ParseError {
        self.line = line;
        self
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        ParseError::io_error(err, 0)
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(|rule| {
            match *rule {
                Rule::EOI => "end of line",
                Rule::line => "QIF line",
                Rule::delimiter => "record delimiter ('^')",
                Rule::header => "section header",
                Rule::header_name => "section name",
                Rule::field => "field",
                Rule::code => "field code",
                Rule::value => "field value",
            }
            .to_string()
        });
        ParseError {
            kind: ParseErrorKind::InvalidParserState {
                message: format!("{}", err),
            },
            line: 0,
            source: Some(Box::new(err)),
        }
    }
}
