//! Credential loading

use std::path::Path;

use crate::error::{ClaimError, Result};
use crate::types::Account;

/// Parse `identifier,token` lines.
///
/// Blank lines are ignored. Fields beyond the second are ignored. Any line
/// with a missing or empty identifier or token fails the whole parse.
pub fn parse_accounts(content: &str) -> Result<Vec<Account>> {
    let mut accounts = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(',').map(str::trim);
        let identifier = fields.next().unwrap_or_default();
        let token = fields.next().unwrap_or_default();

        if identifier.is_empty() || token.is_empty() {
            return Err(ClaimError::credentials(line.trim().to_string(), Some(index + 1)));
        }

        accounts.push(Account::new(identifier, token));
    }

    Ok(accounts)
}

/// Read and parse the accounts file; an empty account list is an error
pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ClaimError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    let accounts = parse_accounts(&content)?;
    if accounts.is_empty() {
        return Err(ClaimError::config(format!(
            "No accounts found in {}",
            path.display()
        )));
    }

    tracing::debug!(count = accounts.len(), path = %path.display(), "Loaded accounts");
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid_lines() {
        let content = "a@example.com, tok1\n\n  \nb@example.com,tok2,extra\n";
        let accounts = parse_accounts(content).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].identifier, "a@example.com");
        assert_eq!(accounts[0].token, "tok1");
        assert_eq!(accounts[1].identifier, "b@example.com");
        assert_eq!(accounts[1].token, "tok2");
    }

    #[test]
    fn test_parse_rejects_missing_token() {
        let err = parse_accounts("a@example.com,tok1\nb@example.com\n").unwrap_err();
        match err {
            ClaimError::Credentials { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_empty_identifier() {
        assert!(parse_accounts(" ,tok1").is_err());
        assert!(parse_accounts("a@example.com, ").is_err());
    }

    #[test]
    fn test_load_empty_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();
        let err = load_accounts(file.path()).unwrap_err();
        assert!(matches!(err, ClaimError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_accounts(&dir.path().join("accounts.txt")).unwrap_err();
        assert!(matches!(err, ClaimError::Io { .. }));
    }
}
