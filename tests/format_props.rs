//! Property tests for the panic-free formatter.

use proptest::prelude::*;
use tidelog::safe_format;

proptest! {
    /// The whole point of safe_format: no input combination may panic.
    #[test]
    fn never_panics(format in ".{0,200}", args in prop::collection::vec(".{0,40}", 0..5)) {
        let _ = safe_format(&format, &args);
    }

    /// Text without braces passes through untouched.
    #[test]
    fn brace_free_text_is_identity(format in "[^{}]{0,200}", args in prop::collection::vec(".{0,40}", 0..5)) {
        prop_assert_eq!(safe_format(&format, &args), format);
    }

    /// An in-range placeholder always lands its argument in the output.
    #[test]
    fn in_range_placeholder_substitutes(arg in "[a-z]{1,20}", prefix in "[^{}]{0,20}", suffix in "[^{}]{0,20}") {
        let format = format!("{}{{0}}{}", prefix, suffix);
        let out = safe_format(&format, &[arg.clone()]);
        prop_assert_eq!(out, format!("{}{}{}", prefix, arg, suffix));
    }

    /// Escaped braces render as single braces regardless of arguments.
    #[test]
    fn doubled_braces_halve(n in 1usize..20, args in prop::collection::vec(".{0,10}", 0..3)) {
        let format: String = "{{".repeat(n);
        prop_assert_eq!(safe_format(&format, &args), "{".repeat(n));
    }
}
