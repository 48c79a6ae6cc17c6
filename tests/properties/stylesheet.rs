//! Property tests for the stylesheet minifier.

use proptest::prelude::*;

use kiln::infrastructure::workers::compile_stylesheet;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Minifying never panics on arbitrary input.
    #[test]
    fn property_compile_never_panics(
        s in "(?s).{0,256}"
    ) {
        let _ = compile_stylesheet(&s);
    }

    /// PROPERTY: Minified output is a fixed point.
    #[test]
    fn property_compile_is_idempotent(
        s in "[a-z0-9 {};:,>/*\n.#-]{0,64}"
    ) {
        if let Ok(once) = compile_stylesheet(&s) {
            let twice = compile_stylesheet(&once);
            prop_assert_eq!(twice.ok(), Some(once));
        }
    }

    /// PROPERTY: Minified output never contains line breaks.
    #[test]
    fn property_output_is_single_line(
        s in "[a-z {};:\n\t]{0,64}"
    ) {
        if let Ok(css) = compile_stylesheet(&s) {
            prop_assert!(!css.contains('\n'));
            prop_assert!(!css.contains('\t'));
        }
    }
}
