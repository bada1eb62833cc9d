//! Javadoc comment conversion
//!
//! Turns a raw `/** ... */` block into reStructuredText body text: the
//! description, then a field list built from block tags. Inline `{@link}`
//! tags become `:java:ref:` roles and their targets are collected so the
//! build can resolve them once the registry is fully populated.

use regex::Regex;

/// A converted Javadoc block
#[derive(Debug, Clone, Default)]
pub struct ConvertedJavadoc {
    /// reStructuredText body: description then field list
    pub body: String,
    /// Raw reference targets found in `{@link}`/`@throws`/`@see` positions
    pub references: Vec<String>,
}

/// Converts Javadoc blocks; holds the compiled inline-tag pattern
pub struct JavadocConverter {
    inline: Regex,
}

impl Default for JavadocConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl JavadocConverter {
    pub fn new() -> Self {
        Self {
            inline: Regex::new(r"\{@(link|linkplain|code|literal)\s+([^}]*)\}")
                .expect("inline tag pattern"),
        }
    }

    /// Convert one raw comment (with or without the `/** */` delimiters)
    pub fn convert(&self, comment: &str) -> ConvertedJavadoc {
        let stripped = strip_comment(comment);
        let mut references = Vec::new();

        let mut description: Vec<String> = Vec::new();
        let mut fields: Vec<String> = Vec::new();

        for section in tag_sections(&stripped) {
            match section {
                Section::Description(line) => {
                    description.push(self.convert_inline(&line, &mut references));
                }
                Section::Tag(tag, rest) => {
                    let rest = self.convert_inline(&rest, &mut references);
                    match tag.as_str() {
                        "param" => {
                            let (name, text) = split_word(&rest);
                            fields.push(format!(":param {}: {}", name, text));
                        }
                        "return" => fields.push(format!(":return: {}", rest)),
                        "throws" | "exception" => {
                            let (name, text) = split_word(&rest);
                            if !name.is_empty() {
                                references.push(name.to_string());
                            }
                            fields.push(format!(":throws {}: {}", name, text));
                        }
                        "see" => {
                            let target = rest.trim();
                            if !target.is_empty() && is_reference_like(target) {
                                references.push(target.to_string());
                                fields.push(format!(":see: :java:ref:`{}`", target));
                            } else {
                                fields.push(format!(":see: {}", rest));
                            }
                        }
                        "deprecated" => fields.push(format!(":deprecated: {}", rest)),
                        "author" => fields.push(format!(":author: {}", rest)),
                        "since" => fields.push(format!(":since: {}", rest)),
                        "version" => fields.push(format!(":version: {}", rest)),
                        // unknown block tags are preserved as generic fields
                        other => fields.push(format!(":{}: {}", other, rest)),
                    }
                }
            }
        }

        while description.last().is_some_and(|line| line.is_empty()) {
            description.pop();
        }

        let mut body = description.join("\n");
        if !fields.is_empty() {
            if !body.is_empty() {
                body.push_str("\n\n");
            }
            body.push_str(&fields.join("\n"));
        }

        ConvertedJavadoc { body, references }
    }

    /// Rewrite inline tags, collecting `{@link}` targets
    fn convert_inline(&self, line: &str, references: &mut Vec<String>) -> String {
        self.inline
            .replace_all(line, |caps: &regex::Captures| {
                let tag = &caps[1];
                let content = caps[2].trim();
                match tag {
                    "link" | "linkplain" => {
                        let (target, label) = split_word(content);
                        references.push(target.to_string());
                        if label.is_empty() {
                            format!(":java:ref:`{}`", target)
                        } else {
                            format!(":java:ref:`{} <{}>`", label, target)
                        }
                    }
                    // code and literal render as literal text
                    _ => format!("``{}``", content),
                }
            })
            .to_string()
    }
}

/// Strip `/** */` delimiters and per-line `*` gutters
fn strip_comment(comment: &str) -> String {
    let trimmed = comment.trim();
    let trimmed = trimmed.strip_prefix("/**").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("*/").unwrap_or(trimmed);

    trimmed
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

enum Section {
    Description(String),
    Tag(String, String),
}

/// Split stripped comment text into description lines and block tags,
/// folding tag continuation lines into their tag
fn tag_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_tag: Option<(String, Vec<String>)> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix('@') {
            if let Some((tag, lines)) = current_tag.take() {
                sections.push(Section::Tag(tag, lines.join(" ")));
            }
            let (tag, rest) = split_word(rest);
            current_tag = Some((tag.to_string(), vec![rest.trim().to_string()]));
        } else if let Some((_, lines)) = current_tag.as_mut() {
            let continuation = line.trim();
            if !continuation.is_empty() {
                lines.push(continuation.to_string());
            }
        } else {
            sections.push(Section::Description(line.to_string()));
        }
    }
    if let Some((tag, lines)) = current_tag {
        sections.push(Section::Tag(tag, lines.join(" ")));
    }

    sections
}

/// Split off the first whitespace-delimited word
fn split_word(text: &str) -> (String, String) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// Heuristic for `@see` arguments that name a symbol rather than free text
fn is_reference_like(text: &str) -> bool {
    !text.contains(' ') && !text.starts_with('<') && !text.starts_with('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(comment: &str) -> ConvertedJavadoc {
        JavadocConverter::new().convert(comment)
    }

    #[test]
    fn test_gutter_stripping() {
        let converted = convert("/**\n * First line.\n * Second line.\n */");
        assert_eq!(converted.body, "First line.\nSecond line.");
    }

    #[test]
    fn test_param_and_return_fields() {
        let converted = convert(
            "/**\n * Gets an element.\n *\n * @param index position to read\n * @return the element\n */",
        );
        assert!(converted.body.contains(":param index: position to read"));
        assert!(converted.body.contains(":return: the element"));
        assert!(converted.body.starts_with("Gets an element."));
    }

    #[test]
    fn test_throws_collects_reference() {
        let converted = convert("/** @throws IOException when the stream fails */");
        assert!(converted.body.contains(":throws IOException: when the stream fails"));
        assert_eq!(converted.references, vec!["IOException"]);
    }

    #[test]
    fn test_inline_link_with_and_without_label() {
        let converted = convert("/** See {@link com.example.Foo} and {@link Bar the bar}. */");
        assert!(converted.body.contains(":java:ref:`com.example.Foo`"));
        assert!(converted.body.contains(":java:ref:`the bar <Bar>`"));
        assert_eq!(converted.references, vec!["com.example.Foo", "Bar"]);
    }

    #[test]
    fn test_inline_code() {
        let converted = convert("/** Returns {@code null} on failure. */");
        assert_eq!(converted.body, "Returns ``null`` on failure.");
        assert!(converted.references.is_empty());
    }

    #[test]
    fn test_tag_continuation_lines() {
        let converted = convert(
            "/**\n * @param name the display name,\n *        never null\n */",
        );
        assert!(converted
            .body
            .contains(":param name: the display name, never null"));
    }

    #[test]
    fn test_see_reference_vs_free_text() {
        let converted = convert("/** @see com.example.Widget */");
        assert!(converted.body.contains(":see: :java:ref:`com.example.Widget`"));
        assert_eq!(converted.references, vec!["com.example.Widget"]);

        let converted = convert("/** @see the user guide */");
        assert!(converted.body.contains(":see: the user guide"));
        assert!(converted.references.is_empty());
    }

    #[test]
    fn test_description_after_tags_is_dropped() {
        // javadoc semantics: once tags start, everything belongs to a tag
        let converted = convert("/** Desc.\n@return x\ntrailing */");
        assert!(converted.body.contains(":return: x trailing"));
    }
}
