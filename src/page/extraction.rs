//! Content extraction functionality for the page module

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::error::PageError;
use super::{ContentKind, ContentNode, PageContent};

/// Tags collected from the main content region, in document order
const CONTENT_TAGS: &str = "h1, h2, h3, h4, h5, h6, p, li";

fn selector(source: &str) -> Result<Selector, PageError> {
    Selector::parse(source)
        .map_err(|e| PageError::HtmlParse(format!("Failed to parse selector '{}': {}", source, e)))
}

/// Trimmed text of an element and all of its descendants
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn content_kind(tag: &str) -> Option<ContentKind> {
    match tag {
        "p" => Some(ContentKind::Paragraph),
        "li" => Some(ContentKind::ListItem),
        _ => tag
            .strip_prefix('h')
            .and_then(|level| level.parse::<u8>().ok())
            .filter(|level| (1..=6).contains(level))
            .map(ContentKind::Heading),
    }
}

/// Extract the title, meta description and ordered content of an HTML page
///
/// # Arguments
///
/// * `html` - The raw HTML of the page
///
/// # Returns
///
/// The extracted page content. A page without a `<main>` element yields
/// an empty `ordered_elements` list rather than an error.
pub fn parse_page(html: &str) -> Result<PageContent, PageError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title")?)
        .next()
        .map(|element| element_text(&element))
        .filter(|title| !title.is_empty());

    let meta_description = document
        .select(&selector("meta[name='description']")?)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty());

    let mut ordered_elements = Vec::new();
    match document.select(&selector("main")?).next() {
        Some(main) => {
            for element in main.select(&selector(CONTENT_TAGS)?) {
                let Some(kind) = content_kind(element.value().name()) else {
                    continue;
                };
                let text = element_text(&element);
                if text.is_empty() {
                    trace!("Dropping empty <{}>", element.value().name());
                    continue;
                }
                ordered_elements.push(ContentNode { kind, text });
            }
        }
        None => debug!("Page has no <main> element"),
    }

    Ok(PageContent {
        title,
        meta_description,
        ordered_elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_paragraph_dropped() {
        let html = "<html><body><main><h1>Hello</h1><p></p><li>World</li></main></body></html>";
        let page = parse_page(html).unwrap();

        assert_eq!(
            page.ordered_elements,
            vec![
                ContentNode::heading(1, "Hello"),
                ContentNode::list_item("World"),
            ]
        );
    }

    #[test]
    fn test_document_order_and_trimming() {
        let html = r#"
            <html><body><main>
                <p>  First paragraph  </p>
                <h2>Section</h2>
                <ul><li> one </li><li>   </li><li>two</li></ul>
                <h6>Small</h6>
                <p>Second <strong>bold</strong> paragraph</p>
            </main></body></html>"#;
        let page = parse_page(html).unwrap();

        let texts: Vec<&str> = page
            .ordered_elements
            .iter()
            .map(|node| node.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "First paragraph",
                "Section",
                "one",
                "two",
                "Small",
                "Second bold paragraph"
            ]
        );
        assert!(page.ordered_elements.iter().all(|n| !n.text.trim().is_empty()));
        assert_eq!(page.ordered_elements[1].kind, ContentKind::Heading(2));
        assert_eq!(page.ordered_elements[4].kind, ContentKind::Heading(6));
    }

    #[test]
    fn test_content_outside_main_is_ignored() {
        let html = r#"
            <html><body>
                <header><h1>Site name</h1><li>Nav</li></header>
                <main><p>Body text</p></main>
                <footer><p>Footer</p></footer>
            </body></html>"#;
        let page = parse_page(html).unwrap();

        assert_eq!(page.ordered_elements, vec![ContentNode::paragraph("Body text")]);
    }

    #[test]
    fn test_only_first_main_is_used() {
        let html = "<main><p>first</p></main><main><p>second</p></main>";
        let page = parse_page(html).unwrap();

        assert_eq!(page.ordered_elements, vec![ContentNode::paragraph("first")]);
    }

    #[test]
    fn test_missing_main_gives_empty_content() {
        let html = "<html><head><title>No main</title></head><body><p>Loose</p></body></html>";
        let page = parse_page(html).unwrap();

        assert_eq!(page.title.as_deref(), Some("No main"));
        assert!(page.ordered_elements.is_empty());
    }

    #[test]
    fn test_title_and_meta_description() {
        let html = r#"<html><head>
            <title>
                Home | Example
            </title>
            <meta name="description" content="An example site">
        </head><body></body></html>"#;
        let page = parse_page(html).unwrap();

        assert_eq!(page.title.as_deref(), Some("Home | Example"));
        assert_eq!(page.meta_description.as_deref(), Some("An example site"));
        assert_eq!(page.meta_description_or_sentinel(), "An example site");
    }

    #[test]
    fn test_missing_meta_and_title() {
        let page = parse_page("<html><head><title>  </title></head></html>").unwrap();

        assert!(page.title.is_none());
        assert!(page.meta_description.is_none());
        assert_eq!(page.meta_description_or_sentinel(), "None");
    }

    #[test]
    fn test_blank_meta_description_is_missing() {
        for content in ["", "   "] {
            let html = format!(
                r#"<html><head><meta name="description" content="{}"></head></html>"#,
                content
            );
            let page = parse_page(&html).unwrap();

            assert!(page.meta_description.is_none());
            assert_eq!(page.meta_description_or_sentinel(), "None");
        }
    }

    #[test]
    fn test_nested_allowed_tags_each_yield_a_node() {
        let html = "<main><ul><li><p>Inner</p></li></ul></main>";
        let page = parse_page(html).unwrap();

        assert_eq!(
            page.ordered_elements,
            vec![ContentNode::list_item("Inner"), ContentNode::paragraph("Inner")]
        );
    }
}
