//! Free-text cleanup for book descriptions.
//!
//! A description block holds a shallow mix of text and inline markup. Each
//! child node is cleaned on its own and the non-empty results are joined with
//! single spaces.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Cleans one serialized description node.
///
/// Trims, removes newlines, turns tabs into spaces (tabs would break TSV
/// output) and strips anything that looks like a tag.
pub fn normalize_fragment(fragment: &str) -> String {
    let text = fragment.trim().replace('\n', "").replace('\t', " ");
    TAG_RE.replace_all(&text, "").into_owned()
}

/// Cleans every fragment, drops the empty ones and joins the rest.
pub fn normalize_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .map(|fragment| normalize_fragment(fragment.as_ref()))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  plain text  ", "plain text")]
    #[case("line one\nline two", "line oneline two")]
    #[case("col\tcol", "col col")]
    #[case("<b>bold</b>", "bold")]
    #[case("<br>", "")]
    #[case("<a href=\"/x\">link</a> and more", "link and more")]
    fn test_normalize_fragment(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_fragment(input), expected);
    }

    #[rstest]
    #[case("An already clean sentence.")]
    #[case("Numbers 1, 2 & 3 stay put")]
    #[case("")]
    fn test_clean_input_is_unchanged(#[case] input: &str) {
        assert_eq!(normalize_fragment(input), input);
        assert_eq!(normalize_fragment(&normalize_fragment(input)), input);
    }

    #[test]
    fn test_normalize_fragments_drops_empty() {
        let nodes = ["First part.", "<br>", "\n", "<i>Second</i>", "  "];
        assert_eq!(normalize_fragments(nodes), "First part. Second");
    }

    #[test]
    fn test_normalize_fragments_empty_input() {
        let nodes: Vec<String> = Vec::new();
        assert_eq!(normalize_fragments(nodes), "");
    }
}
