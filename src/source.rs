//! Input acquisition for the parser entry points.
//!
//! A `Source` is the text to scan, supplied as a string, a byte buffer or
//! any `std::io::Read`. It is read completely before scanning starts.

use std::{borrow::Cow, io::Read, sync::Arc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

pub enum Source<'a> {
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Reader(Box<dyn Read + 'a>),
}

impl<'a> Source<'a> {
    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// Reads the whole input as UTF-8 text.
    pub fn read(self, file: &Arc<String>) -> Result<String, Error> {
        let unreadable = |message: String| {
            Error::new(
                ErrorImpl::SourceUnreadable { message },
                Position::new(Arc::clone(file), 1, 1, 0),
            )
        };

        match self {
            Source::Text(text) => Ok(text.into_owned()),
            Source::Bytes(bytes) => {
                String::from_utf8(bytes.into_owned()).map_err(|e| unreadable(e.to_string()))
            }
            Source::Reader(mut reader) => {
                let mut buffer = String::new();
                reader
                    .read_to_string(&mut buffer)
                    .map_err(|e| unreadable(e.to_string()))?;
                Ok(buffer)
            }
        }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(text: &'a String) -> Self {
        Source::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for Source<'_> {
    fn from(text: String) -> Self {
        Source::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(Cow::Borrowed(bytes))
    }
}

impl From<Vec<u8>> for Source<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(Cow::Owned(bytes))
    }
}
