//! Parsing of published feed state documents
//!
//! Two layouts exist upstream:
//! - `key=value` (`state.txt` of the minute/hour/day feeds)
//! - `key: value` (`state.yaml` of the changeset feed)
//!
//! Only the head sequence number is extracted.

use crate::SequenceNumber;

/// Layout of a state document
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateFormat {
    /// `sequenceNumber=<digits>\n`
    Equals,
    /// `sequence: <digits>\n`
    Colon,
}

impl StateFormat {
    /// Text that immediately precedes the sequence digits
    pub fn marker(self) -> &'static str {
        match self {
            StateFormat::Equals => "sequenceNumber=",
            StateFormat::Colon => "sequence: ",
        }
    }
}

/// Parsed head of a remote feed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FeedState {
    /// Latest published sequence number
    pub sequence: SequenceNumber,
}

/// Error parsing a state document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `<marker><digits>\n` occurrence in the document
    #[error("state document has no '{marker}<digits>' line")]
    MissingField { marker: &'static str },

    /// Digits were found but do not fit a sequence number
    #[error("invalid sequence number '{digits}' in state document")]
    InvalidNumber { digits: String },
}

/// Extract the head sequence number from a state document
///
/// The first `<marker><digits>` occurrence whose digits are directly followed
/// by a newline wins. Anything else is a [`ParseError`].
pub fn parse(document: &str, format: StateFormat) -> Result<FeedState, ParseError> {
    let marker = format.marker();

    for (idx, _) in document.match_indices(marker) {
        let rest = &document[idx + marker.len()..];
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 || !rest[digits_len..].starts_with('\n') {
            continue;
        }

        let digits = &rest[..digits_len];
        return digits
            .parse::<u64>()
            .map(|value| FeedState {
                sequence: SequenceNumber::new(value),
            })
            .map_err(|_| ParseError::InvalidNumber {
                digits: digits.to_string(),
            });
    }

    Err(ParseError::MissingField { marker })
}
