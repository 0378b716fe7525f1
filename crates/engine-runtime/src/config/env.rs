use crate::config::error::ConfigError;

/// Replaces every `${NAME}` in `input` with `lookup(NAME)`.
///
/// `$` not followed by `{` is left untouched, so connection strings with
/// literal dollar signs in passwords survive expansion.
pub fn expand_placeholders<F>(input: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| ConfigError::UnterminatedPlaceholder(input.to_string()))?;

        let name = after[..end].trim();
        let value = lookup(name).ok_or_else(|| ConfigError::MissingVariable(name.to_string()))?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars() -> HashMap<String, String> {
        HashMap::from([
            ("DB_HOST".to_string(), "db.local".to_string()),
            ("DB_PASS".to_string(), "s3cr$t".to_string()),
        ])
    }

    #[test]
    fn test_expands_known_variables() {
        let vars = vars();
        let expanded = expand_placeholders(
            "Server=${DB_HOST};Password=${ DB_PASS };",
            |name| vars.get(name).cloned(),
        )
        .unwrap();
        assert_eq!(expanded, "Server=db.local;Password=s3cr$t;");
    }

    #[test]
    fn test_leaves_plain_dollar_alone() {
        let expanded = expand_placeholders("Password=pa$$word", |_| None).unwrap();
        assert_eq!(expanded, "Password=pa$$word");
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let err = expand_placeholders("Server=${NOPE}", |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(name) if name == "NOPE"));
    }

    #[test]
    fn test_unterminated_placeholder_is_an_error() {
        let err = expand_placeholders("Server=${DB_HOST", |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::UnterminatedPlaceholder(_)));
    }
}
