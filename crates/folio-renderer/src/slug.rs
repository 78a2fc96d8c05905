//! Anchor slugs and display titles.

/// Convert heading text to an anchor slug.
///
/// Lowercases the text, drops every character that is not a word character,
/// whitespace or `-`, and collapses each run of whitespace into a single `-`.
/// Surrounding whitespace is ignored. Hyphens already present are kept as
/// written, so `"a - b"` becomes `"a---b"`.
///
/// Both heading ids and table of contents anchors go through this function.
///
/// # Examples
///
/// ```
/// use folio_renderer::anchor_slug;
///
/// assert_eq!(anchor_slug("Getting Started"), "getting-started");
/// assert_eq!(anchor_slug("What's new?"), "whats-new");
/// assert_eq!(anchor_slug("snake_case stays"), "snake_case-stays");
/// ```
#[must_use]
pub fn anchor_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_alphanumeric() || c == '_' || c == '-' {
            if pending_space && !slug.is_empty() {
                slug.push('-');
            }
            pending_space = false;
            slug.push(c);
        }
    }

    slug
}

/// Convert a file or folder slug to a display title.
///
/// `-` and `_` become word separators and each word is capitalized.
///
/// # Examples
///
/// ```
/// use folio_renderer::slug_to_title;
///
/// assert_eq!(slug_to_title("getting-started"), "Getting Started");
/// assert_eq!(slug_to_title("api_REFERENCE"), "Api Reference");
/// ```
#[must_use]
pub fn slug_to_title(slug: &str) -> String {
    slug.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
