use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a piped scenario from stdin.
///
/// Returns None when stdin is a TTY or the pipe is empty. JSON is tried
/// first; YAML is accepted as a fallback so a scenario file can be piped
/// in either format.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|yaml_err| {
                format!("stdin is neither valid JSON ({json_err}) nor YAML ({yaml_err})").into()
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_pipe_is_none() {
        let parsed: Option<BTreeMap<String, u32>> = parse_piped("   \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_json_and_yaml_pipes() {
        let json: BTreeMap<String, u32> = parse_piped(r#"{"months": 12}"#).unwrap().unwrap();
        let yaml: BTreeMap<String, u32> = parse_piped("months: 12\n").unwrap().unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_garbage_pipe_is_error() {
        assert!(parse_piped::<BTreeMap<String, u32>>("{{{{ :").is_err());
    }
}
