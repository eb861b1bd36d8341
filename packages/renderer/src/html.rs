use crate::page::RenderedPage;
use crate::vdom::VNode;
use bento_model::Page;

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Default::default()
        }
    }
}

struct Context<'a> {
    options: &'a HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        self.add_newline();
    }

    fn add_newline(&mut self) {
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serialize a node tree to HTML
pub fn to_html(node: &VNode, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    write_node(node, &mut ctx);
    ctx.get_output()
}

/// Full HTML document for a rendered page, with theme CSS
pub fn page_document(page: &Page, rendered: &RenderedPage, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = if page.title.is_empty() {
        &page.slug
    } else {
        &page.title
    };
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));
    ctx.add_line("<style>");
    ctx.indent();
    for rule in theme_css(page) {
        ctx.add_line(&rule);
    }
    ctx.dedent();
    ctx.add_line("</style>");
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    write_node(&rendered.root, &mut ctx);
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

fn theme_css(page: &Page) -> Vec<String> {
    let theme = &page.theme;
    vec![
        format!(
            "body {{ margin: 0 auto; max-width: 720px; padding: 24px 12px; background: {}; color: {}; font-family: {}, sans-serif; }}",
            css_value(&theme.background_color),
            css_value(&theme.text_color),
            css_value(&theme.font)
        ),
        "img, video, iframe { display: block; width: 100%; height: 100%; object-fit: cover; border: 0; }".to_string(),
        ".bento-block { position: relative; overflow: hidden; border-radius: 16px; }".to_string(),
        ".bento-link { display: flex; align-items: center; justify-content: center; height: 100%; text-decoration: none; }".to_string(),
        ".bento-controls { position: absolute; top: 4px; right: 4px; display: flex; gap: 4px; }".to_string(),
    ]
}

/// Theme values come from user input; keep them from closing the rule
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
        } => {
            if ctx.options.pretty {
                ctx.add_indent();
            }
            ctx.add(&format!("<{}", tag));

            for (name, value) in attributes {
                ctx.add(&format!(" {}=\"{}\"", name, escape_html(value)));
            }

            if !styles.is_empty() {
                let style = styles
                    .iter()
                    .map(|(key, value)| format!("{}: {};", key, value))
                    .collect::<Vec<_>>()
                    .join(" ");
                ctx.add(&format!(" style=\"{}\"", escape_html(&style)));
            }

            if children.is_empty() && is_self_closing(tag) {
                ctx.add(" />");
                ctx.add_newline();
                return;
            }

            ctx.add(">");

            let block_children = has_element_children(children);
            if block_children {
                ctx.add_newline();
                ctx.indent();
                for child in children {
                    write_node(child, ctx);
                }
                ctx.dedent();
                if ctx.options.pretty {
                    ctx.add_indent();
                }
            } else {
                for child in children {
                    write_inline(child, ctx);
                }
            }

            ctx.add(&format!("</{}>", tag));
            ctx.add_newline();
        }
        VNode::Text { content } => ctx.add_line(&escape_html(content)),
        VNode::Comment { content } => ctx.add_line(&format!("<!-- {} -->", escape_comment(content))),
    }
}

fn write_inline(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Text { content } => ctx.add(&escape_html(content)),
        VNode::Comment { content } => ctx.add(&format!("<!-- {} -->", escape_comment(content))),
        VNode::Element { .. } => write_node(node, ctx),
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_comment(text: &str) -> String {
    text.replace("--", "- -")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "source" | "track" | "wbr"
    )
}

fn has_element_children(children: &[VNode]) -> bool {
    children
        .iter()
        .any(|child| matches!(child, VNode::Element { .. }))
}
