use log::{debug, info};
use scraper::{Html, Selector};
use url::Url;

use crate::parser::{attr_of, selector, Query};

const CARD: &str = "div.listing__content.listing__content--ltr.listingInfo.ctaMap2";
const CARD_LINK: &str = "a.listing__name--link.listing__link.jsListingName";

/// Joins a site-relative path onto `base`. Falls back to plain concatenation
/// when `base` is not a valid URL.
pub fn absolutize(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base.trim_end_matches('/'), href),
    }
}

/// Pulls listing-detail URLs out of a search-results page.
pub struct LinkExtractor {
    base_url: String,
    card: Selector,
    card_link: Selector,
}

impl LinkExtractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        LinkExtractor {
            base_url: base_url.into(),
            card: selector(CARD),
            card_link: selector(CARD_LINK),
        }
    }

    /// Absolute listing URLs in document order. Cards without a usable link are skipped.
    pub fn extract_links(&self, document: &Html) -> Vec<String> {
        info!("Finding all listing links...");
        let links: Vec<String> = document
            .root_element()
            .find_all(&self.card)
            .into_iter()
            .filter_map(|card| card.find(&self.card_link))
            .filter_map(|anchor| attr_of(&anchor, "href"))
            .map(|href| {
                let link = absolutize(&self.base_url, href);
                debug!("Found listing link: {}", link);
                link
            })
            .collect();
        info!("Total links found: {}", links.len());
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn card(href: Option<&str>) -> String {
        let anchor = match href {
            Some(h) => format!(
                r#"<a class="listing__name--link listing__link jsListingName" href="{h}">Shop</a>"#
            ),
            None => r#"<span class="listing__name">No link</span>"#.to_string(),
        };
        format!(
            r#"<div class="listing__content listing__content--ltr listingInfo ctaMap2">{anchor}</div>"#
        )
    }

    #[test]
    fn links_are_absolute_and_in_document_order() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            card(Some("/bus/Ontario/Toronto/Pizza-Place/1.html")),
            card(None),
            card(Some("/bus/Ontario/Toronto/Sushi-Bar/2.html")),
        );
        let links = LinkExtractor::new("https://www.yellowpages.ca").extract_links(&parse(&html));
        assert_eq!(
            links,
            vec![
                "https://www.yellowpages.ca/bus/Ontario/Toronto/Pizza-Place/1.html",
                "https://www.yellowpages.ca/bus/Ontario/Toronto/Sushi-Bar/2.html",
            ]
        );
    }

    #[test]
    fn no_cards_no_links() {
        let html = r#"<html><body><div class="listing__content">nothing</div></body></html>"#;
        let links = LinkExtractor::new("https://www.yellowpages.ca").extract_links(&parse(html));
        assert!(links.is_empty());
    }

    #[test]
    fn absolutize_keeps_absolute_hrefs() {
        assert_eq!(
            absolutize("https://www.yellowpages.ca", "https://other.example/x"),
            "https://other.example/x"
        );
        assert_eq!(absolutize("not a url", "/path"), "not a url/path");
    }
}
