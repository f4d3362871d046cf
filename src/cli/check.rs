//! Compile a script without running it

use super::CliError;
use crate::Mapping;

/// What a successful check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub statements: usize,
}

/// Compiles `script` and reports its statement count.
pub fn execute_check(script: &str) -> Result<CheckReport, CliError> {
    let mapping = Mapping::compile(script)?;
    Ok(CheckReport {
        statements: mapping.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_counts_statements() {
        let report = execute_check("// header\na = b\n\n<<p>> :: c\n<<p>> = d\n").unwrap();
        assert_eq!(report, CheckReport { statements: 2 });
    }

    #[test]
    fn test_check_reports_position() {
        let error = execute_check("a = b\n=A[B$(x)]").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Compile error: unexpected token 'B' [Item] at line 2, column 4"
        );
    }
}
