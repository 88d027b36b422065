use pulldown_cmark::{html, Options, Parser};

use super::name::DocumentKind;

/// A document body ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub kind: DocumentKind,
    pub body: Vec<u8>,
}

impl Rendered {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("no renderer for .{0} files")]
    Unsupported(String),
    #[error("{0} has no file extension")]
    MissingExtension(String),
}

/// Pick a renderer from the extension of `name` and apply it to `content`.
pub fn render(name: &str, content: &[u8]) -> Result<Rendered, RenderError> {
    let (_, extension) = name
        .rsplit_once('.')
        .ok_or_else(|| RenderError::MissingExtension(name.to_string()))?;
    let kind = DocumentKind::from_extension(extension)
        .ok_or_else(|| RenderError::Unsupported(extension.to_string()))?;

    let body = match kind {
        DocumentKind::Text => content.to_vec(),
        DocumentKind::Markdown => markdown_to_html(&String::from_utf8_lossy(content)).into_bytes(),
    };

    Ok(Rendered { kind, body })
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
