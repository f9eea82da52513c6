use scraper::{Html, Selector};

/// Parse a free-form HTML instruction blob into step texts.
///
/// List items win when there are any. Otherwise the plain text is split on
/// sentence boundaries (a period followed by whitespace).
pub fn parse_html_instructions(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);

    if let Ok(li_selector) = Selector::parse("li") {
        let items: Vec<_> = fragment.select(&li_selector).collect();
        if !items.is_empty() {
            return items
                .into_iter()
                .map(|li| li.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty())
                .collect();
        }
    }

    let text: String = fragment.root_element().text().collect();
    split_sentences(&text)
}

/// Split on `.` followed by one or more whitespace characters, dropping
/// the separator and any empty fragments. A trailing period is kept.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '.' && chars.peek().is_some_and(|next| next.is_whitespace()) {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
            continue;
        }
        current.push(c);
    }
    sentences.push(current);

    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Text content of an HTML snippet, e.g. a recipe summary
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<String>().trim().to_string()
}
