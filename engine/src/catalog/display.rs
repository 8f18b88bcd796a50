use once_cell::sync::Lazy;
use std::collections::HashMap;

static BUILTIN_DISPLAY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("clean_new", "Чистая (новая)"),
        ("clean_old", "Чистая (старая)"),
        ("cyrodiil", "Сиродиил"),
        ("pinot_grigio", "Pinot Grigio"),
    ])
});

const LOWERCASE_WORDS: [&str; 4] = ["And", "Or", "The", "Of"];

/// Human-readable labels for the theme selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNames {
    overrides: HashMap<String, String>,
}

impl DisplayNames {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Configured override, then the built-in table, then [`format_theme_id`].
    pub fn display_name(&self, theme_id: &str) -> String {
        if let Some(name) = self.overrides.get(theme_id) {
            return name.clone();
        }
        if let Some(name) = BUILTIN_DISPLAY_NAMES.get(theme_id) {
            return (*name).to_string();
        }
        format_theme_id(theme_id)
    }
}

/// `pride_and_prejudice` -> `Pride and Prejudice`.
///
/// Underscores become spaces, the first letter after whitespace is
/// upper-cased, and the words And/Or/The/Of are lower-cased wherever they
/// stand alone.
pub fn format_theme_id(theme_id: &str) -> String {
    let spaced = theme_id.replace('_', " ");

    let mut capitalized = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if at_word_start && is_word_char(c) {
            capitalized.push(c.to_ascii_uppercase());
        } else {
            capitalized.push(c);
        }
        at_word_start = c.is_whitespace();
    }

    let mut result = String::with_capacity(capitalized.len());
    let mut word = String::new();
    for c in capitalized.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            flush_word(&mut word, &mut result);
            result.push(c);
        }
    }
    flush_word(&mut word, &mut result);
    result
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn flush_word(word: &mut String, out: &mut String) {
    if LOWERCASE_WORDS.contains(&word.as_str()) {
        out.push_str(&word.to_lowercase());
    } else {
        out.push_str(word);
    }
    word.clear();
}
