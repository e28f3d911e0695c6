use crate::{ParseError, ParsedInput};
use confguard_types::InputFormat;

pub(crate) fn parse(text: &str) -> Result<ParsedInput, ParseError> {
    serde_json::from_str(text)
        .map(ParsedInput::single)
        .map_err(|e| ParseError::syntax(InputFormat::Json, e))
}
