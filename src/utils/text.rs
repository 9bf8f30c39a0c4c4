use scraper::{Html, Node};

/// Lowercase URL slug: ASCII alphanumerics kept, every other run collapsed to `-`.
#[must_use]
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Visible text of an HTML fragment: entities decoded, script and style bodies dropped.
#[must_use]
pub fn strip_tags(s: &str) -> String {
    let fragment = Html::parse_fragment(s);
    let mut parts = Vec::new();
    for node in fragment.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}

/// Plain-text summary of at most `max_words` words, `...` appended when cut.
#[must_use]
pub fn trim_words(s: &str, max_words: usize) -> String {
    let plain = strip_tags(s);
    let words: Vec<&str> = plain.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    format!("{}...", words[..max_words].join(" "))
}
