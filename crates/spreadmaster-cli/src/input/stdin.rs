use serde_json::Value;
use std::io::{self, Read};

/// Piped calculator input: a JSON document in the same shape as an
/// `--input` file.
///
/// An interactive terminal or an empty pipe means nothing was piped, which
/// hands control back to the flag path.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().lock().read_to_string(&mut piped)?;
    parse_piped(&piped)
}

fn parse_piped(piped: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let document = piped.trim();
    if document.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(document)
        .map_err(|e| format!("Piped input is not a JSON calculator document: {}", e))?;
    Ok(Some(value))
}
