//! `%s`-style positional argument rendering.
//!
//! Handlers in the backend log with templates such as `"user %s created"`
//! and a list of arguments. The conversions `%s`, `%d`, `%i`, `%r` and `%f`
//! all substitute the argument's display form; `%%` is a literal percent.

use crate::error::FormatError;

/// Substitute `args` into `template`, in order.
///
/// Fails when the number of conversions and arguments differ, or on an
/// unknown conversion character.
pub fn interpolate(template: &str, args: &[String]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + args.iter().map(String::len).sum::<usize>());
    let mut next_arg = 0;
    let mut chars = template.char_indices();

    while let Some((idx, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '%')) => out.push('%'),
            Some((_, 's' | 'd' | 'i' | 'r' | 'f')) => {
                let arg = args.get(next_arg).ok_or(FormatError::NotEnoughArguments {
                    expected: count_conversions(template),
                    given: args.len(),
                })?;
                out.push_str(arg);
                next_arg += 1;
            }
            Some((_, other)) => return Err(FormatError::UnsupportedConversion(other, idx)),
            None => return Err(FormatError::Incomplete),
        }
    }

    if next_arg < args.len() {
        return Err(FormatError::TooManyArguments {
            expected: next_arg,
            given: args.len(),
        });
    }
    Ok(out)
}

fn count_conversions(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('%') | None => {}
                Some(_) => count += 1,
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_substitutes_in_order() {
        let out = interpolate("user %s created", &args(&["alice"])).unwrap();
        assert_eq!(out, "user alice created");

        let out = interpolate("%s moved %d beds to %r", &args(&["ward 4", "3", "ICU"])).unwrap();
        assert_eq!(out, "ward 4 moved 3 beds to ICU");
    }

    #[test]
    fn test_literal_percent() {
        let out = interpolate("occupancy at %d%%", &args(&["90"])).unwrap();
        assert_eq!(out, "occupancy at 90%");
    }

    #[test]
    fn test_argument_count_mismatch() {
        assert_eq!(
            interpolate("%s and %s", &args(&["one"])),
            Err(FormatError::NotEnoughArguments { expected: 2, given: 1 })
        );
        assert_eq!(
            interpolate("no placeholders", &args(&["extra"])),
            Err(FormatError::TooManyArguments { expected: 0, given: 1 })
        );
    }

    #[test]
    fn test_bad_conversion() {
        assert_eq!(
            interpolate("50%x", &[]),
            Err(FormatError::UnsupportedConversion('x', 2))
        );
        assert_eq!(interpolate("trailing %", &[]), Err(FormatError::Incomplete));
    }
}
