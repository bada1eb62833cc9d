//! reStructuredText document assembly
//!
//! Minimal builder for the generated pages: headings, directives with
//! options and indented content, and plain lines. Directives nest by
//! adding a built directive as content of another.

/// A directive block, e.g. `.. java:method:: public void run()`
#[derive(Debug, Clone)]
pub struct Directive {
    name: String,
    argument: String,
    options: Vec<(String, String)>,
    content: Vec<String>,
}

impl Directive {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            argument: String::new(),
            options: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn with_argument(name: &str, argument: &str) -> Self {
        let mut directive = Self::new(name);
        directive.argument = argument.to_string();
        directive
    }

    pub fn add_option(&mut self, name: &str, value: &str) {
        self.options.push((name.to_string(), value.to_string()));
    }

    /// Append a block of content; every line is indented under the directive
    pub fn add_content(&mut self, text: &str) {
        if !self.content.is_empty() {
            self.content.push(String::new());
        }
        for line in text.lines() {
            self.content.push(line.to_string());
        }
    }

    pub fn build(&self) -> String {
        let mut out = if self.argument.is_empty() {
            format!(".. {}::", self.name)
        } else {
            format!(".. {}:: {}", self.name, self.argument)
        };
        for (name, value) in &self.options {
            out.push('\n');
            if value.is_empty() {
                out.push_str(&format!("   :{}:", name));
            } else {
                out.push_str(&format!("   :{}: {}", name, value));
            }
        }
        if !self.content.is_empty() {
            out.push_str("\n");
            for line in &self.content {
                out.push('\n');
                if line.is_empty() {
                    continue;
                }
                out.push_str("   ");
                out.push_str(line);
            }
        }
        out
    }
}

/// An ordered sequence of reStructuredText blocks
#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section heading with the given underline character
    pub fn add_heading(&mut self, text: &str, underline: char) {
        self.blocks.push(format!(
            "{}\n{}",
            text,
            underline.to_string().repeat(text.chars().count())
        ));
    }

    pub fn add_line(&mut self, line: &str) {
        self.blocks.push(line.to_string());
    }

    pub fn add_directive(&mut self, directive: &Directive) {
        self.blocks.push(directive.build());
    }

    /// Join all blocks with blank lines and a trailing newline
    pub fn build(&self) -> String {
        let mut out = self.blocks.join("\n\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_underline_length() {
        let mut doc = Document::new();
        doc.add_heading("Widget", '=');
        assert_eq!(doc.build(), "Widget\n======\n");
    }

    #[test]
    fn test_directive_with_options_and_content() {
        let mut toc = Directive::new("toctree");
        toc.add_option("maxdepth", "1");
        toc.add_content("Widget\nHandle");
        assert_eq!(
            toc.build(),
            ".. toctree::\n   :maxdepth: 1\n\n   Widget\n   Handle"
        );
    }

    #[test]
    fn test_directive_argument_and_flag_option() {
        let mut pkg = Directive::with_argument("java:package", "com.example");
        pkg.add_option("noindex", "");
        assert_eq!(pkg.build(), ".. java:package:: com.example\n   :noindex:");
    }

    #[test]
    fn test_nested_directive_indentation() {
        let mut outer = Directive::with_argument("java:type", "public class Widget");
        let inner = Directive::with_argument("java:method", "void run()");
        outer.add_content(&inner.build());
        let built = outer.build();
        assert!(built.contains("\n   .. java:method:: void run()"));
    }

    #[test]
    fn test_document_blocks_are_blank_line_separated() {
        let mut doc = Document::new();
        doc.add_heading("Title", '=');
        doc.add_line("Some text.");
        let built = doc.build();
        assert_eq!(built, "Title\n=====\n\nSome text.\n");
    }
}
