//! Fence stripping for streamed model output.
//!
//! The raw text is usually a prefix of the final response, so every function
//! here must cope with half-written fences.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[A-Za-z0-9_+#.\-]*[ \t]*\r?\n([\s\S]*?)```").expect("valid regex")
});

static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([A-Za-z0-9_+#.\-]*)[ \t]*\r?\n").expect("valid regex"));

/// Returns the display text for `raw`.
///
/// Interiors of complete fenced blocks are joined in order; prose and any
/// block still waiting for its closing fence are dropped. Without any
/// complete block the trimmed raw text is returned as is.
#[must_use]
pub fn extract(raw: &str) -> String {
    let interiors: Vec<&str> = FENCED_BLOCK
        .captures_iter(raw)
        .filter_map(|captures| captures.get(1).map(|body| body.as_str()))
        .collect();

    if interiors.is_empty() {
        return raw.trim().to_string();
    }

    interiors.join("\n").trim().to_string()
}

/// Language tag of the first opening fence whose tag line is complete.
#[must_use]
pub fn fence_language(raw: &str) -> Option<&str> {
    OPEN_FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|tag| !tag.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_single_tagged_block() {
        let raw = "```tsx\nexport default function App() {}\n```";
        assert_eq!(extract(raw), "export default function App() {}");
    }

    #[test]
    fn strips_untagged_block_and_surrounding_prose() {
        let raw = "Here is your app:\n\n```\nconst x = 1;\n```\n\nEnjoy!";
        assert_eq!(extract(raw), "const x = 1;");
    }

    #[test]
    fn accepts_any_language_tag() {
        for tag in ["typescript", "javascript", "python", "c++", "objective-c", "f#"] {
            let raw = format!("```{tag}\nbody\n```");
            assert_eq!(extract(&raw), "body", "tag {tag}");
        }
    }

    #[test]
    fn concatenates_multiple_blocks_in_order() {
        let raw = "```ts\nconst a = 1;\n```\ntext\n```css\n.b {}\n```";
        assert_eq!(extract(raw), "const a = 1;\n\n.b {}");
    }

    #[test]
    fn falls_back_to_trimmed_raw_without_complete_fence() {
        assert_eq!(extract("  plain answer \n"), "plain answer");
        assert_eq!(
            extract("```tsx\nfunction Calc()"),
            "```tsx\nfunction Calc()"
        );
        assert_eq!(extract("``` not a fence ```"), "``` not a fence ```");
        assert_eq!(extract(""), "");
    }

    #[test]
    fn ignores_unterminated_block_after_a_complete_one() {
        let raw = "```ts\none\n```\n```ts\ntwo\n``";
        assert_eq!(extract(raw), "one");

        let raw = "```ts\nA\n```\nSome notes: ```js\nB";
        assert_eq!(extract(raw), "A");

        let raw = "```ts\none\n```\n```ts";
        assert_eq!(extract(raw), "one");
    }

    #[test]
    fn handles_crlf_fences() {
        let raw = "```js\r\nlet x;\r\n```";
        assert_eq!(extract(raw), "let x;");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "plain",
            "```tsx\nfunction Calc()",
            "```tsx\nfunction Calc() { return <div/> }\n```",
            "intro\n```\na\n```\n```py\nb\n```\ntrailing ```",
            "```ts\none\n```\n```ts\n``two",
            "````\nx\n````",
            "   ```\n\n```   ",
        ];

        for sample in samples {
            let once = extract(sample);
            assert_eq!(extract(&once), once, "sample {sample:?}");
        }
    }

    proptest! {
        #[test]
        fn extract_is_idempotent_for_any_input(raw in "[`a \n\t]{0,40}") {
            let once = extract(&raw);
            prop_assert_eq!(extract(&once), once);
        }

        #[test]
        fn extract_is_idempotent_for_fenced_text(
            prose in "[a-z \n]{0,12}",
            tag in "[a-z]{0,4}",
            body in "[a-z`{}; \n]{0,24}",
            tail in "[`a-z \n]{0,12}",
        ) {
            let raw = format!("{prose}```{tag}\n{body}```{tail}");
            let once = extract(&raw);
            prop_assert!(!once.contains("```"));
            prop_assert_eq!(extract(&once), once);
        }

        #[test]
        fn single_block_yields_its_trimmed_interior(
            tag in "[a-z]{0,6}",
            body in "[a-z(){};= \n]{0,40}",
        ) {
            let raw = format!("Here you go:\n```{tag}\n{body}```\nEnjoy.");
            prop_assert_eq!(extract(&raw), body.trim());
        }
    }

    #[test]
    fn output_never_contains_complete_fence() {
        let raw = "```a\nx\n```\n```b\ny\n```";
        let out = extract(raw);
        assert!(!out.contains("```"));
    }

    #[test]
    fn detects_fence_language() {
        assert_eq!(fence_language("```tsx\ncode"), Some("tsx"));
        assert_eq!(fence_language("prose\n```python\n"), Some("python"));
        assert_eq!(fence_language("```\ncode\n```"), None);
        assert_eq!(fence_language("```ts"), None);
        assert_eq!(fence_language("no fences"), None);
    }
}
