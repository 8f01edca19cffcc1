//! CSV formula-injection neutralisation for spreadsheet exports.

use std::borrow::Cow;

/// Characters spreadsheet applications interpret as a formula trigger when
/// they open a cell.
const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Neutralise a cell destined for CSV export.
///
/// Cells whose first character is a formula trigger are prefixed with a
/// literal quote so spreadsheet applications render them as plain text
/// instead of executing them. `None` and non-triggering strings pass through
/// unchanged (borrowed, no allocation).
pub fn sanitize_csv_cell(cell: Option<&str>) -> Option<Cow<'_, str>> {
    let value = cell?;
    let needs_quote = value
        .chars()
        .next()
        .is_some_and(|first| FORMULA_TRIGGERS.contains(&first));
    Some(if needs_quote {
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("=cmd|' /C calc'!A0", "'=cmd|' /C calc'!A0")]
    #[case("=SUM(A1:A4)", "'=SUM(A1:A4)")]
    #[case("+33612345678", "'+33612345678")]
    #[case("-2", "'-2")]
    #[case("@import", "'@import")]
    #[case("\tleading tab", "'\tleading tab")]
    #[case("\rleading cr", "'\rleading cr")]
    fn triggering_cells_are_quoted(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_csv_cell(Some(input)).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("hello")]
    #[case("Jean Dupont")]
    #[case("contains = but not first")]
    #[case("")]
    fn safe_cells_pass_through(#[case] input: &str) {
        let sanitized = sanitize_csv_cell(Some(input)).expect("some input");
        assert_eq!(sanitized, input);
        assert!(matches!(sanitized, Cow::Borrowed(_)));
    }

    #[rstest]
    fn none_passes_through() {
        assert!(sanitize_csv_cell(None).is_none());
    }
}
