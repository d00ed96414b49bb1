pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a whole input document, if one was supplied.
///
/// An `--input` file always wins. Piped stdin is only consulted when no
/// input flags were given on the command line, so flag-driven runs
/// never block on a non-interactive stdin. `Ok(None)` means the caller should
/// build the input from flags.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    flags_given: bool,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_input(path)?));
    }
    if flags_given {
        return Ok(None);
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
