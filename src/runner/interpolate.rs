//! Variable interpolation for shell scripts
//!
//! Replaces `${var}` with a context variable. Every other name is left
//! untouched for the shell to expand when the script runs.

use crate::error::{InterpolationError, InterpolationResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Values may themselves contain `${var}`; give up after this many passes
const MAX_PASSES: usize = 16;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}").expect("valid pattern"))
}

/// Interpolate variables in a string
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let mut result = s.to_string();

    for _ in 0..MAX_PASSES {
        let mut changed = false;
        let next = pattern()
            .replace_all(&result, |caps: &Captures| {
                let name = &caps[1];
                match vars.get(name).cloned() {
                    Some(value) => {
                        changed = true;
                        value
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        if !changed {
            return Ok(next);
        }
        result = next;
    }

    Err(InterpolationError::RecursiveInterpolation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("ATBUILD_PLATFORM".to_string(), "linux".to_string());

        let result = interpolate("echo ${ATBUILD_PLATFORM}", &vars).unwrap();
        assert_eq!(result, "echo linux");
    }

    #[test]
    fn test_repeated_variable() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "app".to_string());

        let result = interpolate("${name}/${name}.o", &vars).unwrap();
        assert_eq!(result, "app/app.o");
    }

    #[test]
    fn test_environment_is_left_to_the_shell() {
        let result = interpolate("cd ${PWD} && echo ${HOME}", &HashMap::new()).unwrap();
        assert_eq!(result, "cd ${PWD} && echo ${HOME}");
    }

    #[test]
    fn test_undefined_variable_is_left_alone() {
        let result = interpolate("Hello, ${ATBUILD_UNDEFINED_XYZ}!", &HashMap::new()).unwrap();
        assert_eq!(result, "Hello, ${ATBUILD_UNDEFINED_XYZ}!");
    }

    #[test]
    fn test_nested_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("inner".to_string(), "value".to_string());
        vars.insert("outer".to_string(), "${inner}".to_string());

        let result = interpolate("Result: ${outer}", &vars).unwrap();
        assert_eq!(result, "Result: value");
    }

    #[test]
    fn test_self_reference_is_recursive() {
        let mut vars = HashMap::new();
        vars.insert("loop".to_string(), "${loop}".to_string());

        let result = interpolate("${loop}", &vars);
        assert!(matches!(result, Err(InterpolationError::RecursiveInterpolation)));
    }

    #[test]
    fn test_shell_syntax_untouched() {
        let result = interpolate("for f in *.o; do echo $f; done", &HashMap::new()).unwrap();
        assert_eq!(result, "for f in *.o; do echo $f; done");
    }
}
