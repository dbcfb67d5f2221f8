use scraper::{ElementRef, Html, Selector};

/// Parses a response body. Malformed markup is repaired, never rejected.
pub fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

/// Compiles one of the crate's built-in selectors.
pub fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("built-in selector must parse")
}

/// First-match and all-match queries over an element's subtree.
/// Results borrow from the document, not from the element handle.
pub trait Query<'a> {
    fn find(&self, selector: &Selector) -> Option<ElementRef<'a>>;
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;
}

impl<'a> Query<'a> for ElementRef<'a> {
    fn find(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

/// All descendant text, trimmed.
pub fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn attr_of<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}
