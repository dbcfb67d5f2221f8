use indexmap::IndexSet;
use log::{info, warn};
use scraper::{ElementRef, Html, Selector};

use crate::config::NOT_AVAILABLE;
use crate::error::FieldError;
use crate::links::absolutize;
use crate::parser::{attr_of, selector, text_of, Query};
use crate::record::ListingRecord;

const TITLE: &str = "h1.merchantInfo-title.merchant__title:not(.only-title)";
const TITLE_FALLBACK: &str = "h1.merchantInfo-title.merchant__title.only-title";
const SPAN: &str = "span";
const ANCHOR: &str = "a";
const SUBMENU: &str = "ul.mlr__submenu.jsMlrSubMenu";
const PHONE_ITEM: &str = "li.mlr__submenu__item";
const PHONE_TEXT: &str = "span.mlr__sub-text";
const WEBSITE_ITEM: &str = "li.mlr__item.mlr__item--website";
const NESTED_WEBSITE_ITEM: &str = "li.mlr__submenu__item.mlr__submenu__itemnotprint";
const ADDRESS: &str = r#"div[itemprop="address"]"#;
const STREET: &str = r#"span[itemprop="streetAddress"]"#;
const LOCALITY: &str = r#"span[itemprop="addressLocality"]"#;
const REGION: &str = r#"span[itemprop="addressRegion"]"#;
const POSTAL_CODE: &str = r#"span[itemprop="postalCode"]"#;
const USEFUL_LINKS: &str = "div.merchant__useful_item.mlr__item--website";
const LIST: &str = "ul";
const LIST_ITEM: &str = "li";
const DETAIL_PANEL: &str = "div.business__details.jsParentContainer";
const PANEL_HEADING: &str = "h2.module__title";

const REDIRECT_PARAM: &str = "redirect=";

/// Destination of a tracking link: everything after the last `redirect=`,
/// percent-decoded. Invalid UTF-8 becomes U+FFFD. `None` when `href` is not
/// redirect-wrapped.
pub fn unwrap_redirect(href: &str) -> Option<String> {
    let start = href.rfind(REDIRECT_PARAM)? + REDIRECT_PARAM.len();
    let decoded = urlencoding::decode_binary(href[start..].as_bytes());
    Some(String::from_utf8_lossy(&decoded).into_owned())
}

/// The labelled detail panels a listing may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    RestaurantType,
    CuisineType,
    Atmosphere,
    LanguagesSpoken,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::RestaurantType,
        Category::CuisineType,
        Category::Atmosphere,
        Category::LanguagesSpoken,
    ];

    /// Field name in the record, also the heading text it is recognised by.
    pub fn label(self) -> &'static str {
        match self {
            Category::RestaurantType => "Restaurant Type",
            Category::CuisineType => "Cuisine Type",
            Category::Atmosphere => "Atmosphere",
            Category::LanguagesSpoken => "Languages Spoken",
        }
    }

    pub fn from_heading(heading: &str) -> Option<Category> {
        let heading = heading.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| heading.contains(&c.label().to_lowercase()))
    }

    // Only the restaurant-type list is long enough to get "more..." / "less..." toggles.
    fn strips_toggles(self) -> bool {
        self == Category::RestaurantType
    }
}

fn is_toggle(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("more...") || text.contains("less...")
}

fn missing(field: &'static str, selector: &'static str) -> FieldError {
    FieldError::MissingNode { field, selector }
}

fn href_of<'a>(anchor: &ElementRef<'a>, field: &'static str) -> Result<&'a str, FieldError> {
    attr_of(anchor, "href").ok_or(FieldError::MissingAttribute {
        field,
        attribute: "href",
    })
}

/// Turns one listing-detail page into a [`ListingRecord`]. Each section is
/// extracted independently; a failing section never removes or blocks
/// another section's fields.
pub struct ListingExtractor {
    base_url: String,
    title: Selector,
    title_fallback: Selector,
    span: Selector,
    anchor: Selector,
    submenu: Selector,
    phone_item: Selector,
    phone_text: Selector,
    website_item: Selector,
    nested_website_item: Selector,
    address: Selector,
    street: Selector,
    locality: Selector,
    region: Selector,
    postal_code: Selector,
    useful_links: Selector,
    list: Selector,
    list_item: Selector,
    detail_panel: Selector,
    panel_heading: Selector,
}

impl ListingExtractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        ListingExtractor {
            base_url: base_url.into(),
            title: selector(TITLE),
            title_fallback: selector(TITLE_FALLBACK),
            span: selector(SPAN),
            anchor: selector(ANCHOR),
            submenu: selector(SUBMENU),
            phone_item: selector(PHONE_ITEM),
            phone_text: selector(PHONE_TEXT),
            website_item: selector(WEBSITE_ITEM),
            nested_website_item: selector(NESTED_WEBSITE_ITEM),
            address: selector(ADDRESS),
            street: selector(STREET),
            locality: selector(LOCALITY),
            region: selector(REGION),
            postal_code: selector(POSTAL_CODE),
            useful_links: selector(USEFUL_LINKS),
            list: selector(LIST),
            list_item: selector(LIST_ITEM),
            detail_panel: selector(DETAIL_PANEL),
            panel_heading: selector(PANEL_HEADING),
        }
    }

    pub fn extract_fields(&self, document: &Html) -> ListingRecord {
        let root = document.root_element();
        let mut record = ListingRecord::new(self.title(&root));

        if let Err(e) = self.phones(&root, &mut record) {
            warn!("Phone extraction failed: {}", e);
            record.insert("phone", NOT_AVAILABLE);
        }

        match self.websites(&root) {
            Ok(websites) if websites.is_empty() => {
                info!("No websites found at all.");
                record.insert("website", NOT_AVAILABLE);
            }
            Ok(websites) => {
                for (i, website) in websites.into_iter().enumerate() {
                    record.insert(format!("website_{}", i + 1), website);
                }
            }
            Err(e) => {
                warn!("Website extraction failed: {}", e);
                record.insert("website", NOT_AVAILABLE);
            }
        }

        match self.address(&root) {
            Ok(address) => {
                info!("Address found: {}", address);
                record.insert("Address", address);
            }
            Err(e) => {
                warn!("Address extraction failed: {}", e);
                record.insert("Address", NOT_AVAILABLE);
            }
        }

        if let Err(e) = self.social_accounts(&root, &mut record) {
            warn!("Social media extraction stopped: {}", e);
        }

        self.categories(&root, &mut record);

        info!("Data fetched for '{}': {} fields", record.title(), record.len());
        record
    }

    fn title(&self, root: &ElementRef<'_>) -> String {
        let heading = root.find(&self.title).or_else(|| {
            info!("Primary title markup missing, trying fallback.");
            root.find(&self.title_fallback)
        });
        let Some(heading) = heading else {
            warn!("Title not found.");
            return NOT_AVAILABLE.to_string();
        };
        let title = match heading.find(&self.span) {
            Some(span) => text_of(&span),
            None => text_of(&heading),
        };
        info!("Title found: {}", title);
        title
    }

    /// Writes `phone_1..` as it goes, so a bad item keeps the ones before it.
    fn phones(&self, root: &ElementRef<'_>, record: &mut ListingRecord) -> Result<(), FieldError> {
        let Some(menu) = root.find(&self.submenu) else {
            info!("Phone number list not found.");
            return Ok(());
        };
        let items = menu.find_all(&self.phone_item);
        if items.is_empty() {
            info!("No phone numbers found.");
        }
        for (i, item) in items.iter().enumerate() {
            let span = item
                .find(&self.phone_text)
                .ok_or_else(|| missing("phone", PHONE_TEXT))?;
            let phone = text_of(&span);
            info!("Phone {} found: {}", i + 1, phone);
            let value = if phone.is_empty() { NOT_AVAILABLE.to_string() } else { phone };
            record.insert(format!("phone_{}", i + 1), value);
        }
        Ok(())
    }

    /// Primary website plus any nested submenu entries, deduplicated in first-seen order.
    fn websites(&self, root: &ElementRef<'_>) -> Result<IndexSet<String>, FieldError> {
        let mut websites = IndexSet::new();

        match root.find(&self.website_item) {
            Some(item) => {
                if let Some(anchor) = item.find(&self.anchor) {
                    let href = href_of(&anchor, "website")?;
                    let website = unwrap_redirect(href).unwrap_or_else(|| href.to_string());
                    info!("Main website found: {}", website);
                    websites.insert(website);
                }
            }
            None => info!("Main website not available."),
        }

        let submenus = root.find_all(&self.submenu);
        if submenus.is_empty() {
            info!("No submenus or nested websites found.");
        }
        for submenu in submenus {
            for item in submenu.find_all(&self.nested_website_item) {
                let Some(anchor) = item.find(&self.anchor) else {
                    continue;
                };
                let href = href_of(&anchor, "website")?;
                let website =
                    unwrap_redirect(href).unwrap_or_else(|| absolutize(&self.base_url, href));
                websites.insert(website);
            }
        }

        Ok(websites)
    }

    /// All four parts are required; a partial address is not produced.
    fn address(&self, root: &ElementRef<'_>) -> Result<String, FieldError> {
        let block = root
            .find(&self.address)
            .ok_or_else(|| missing("Address", ADDRESS))?;
        let part = |sel: &Selector, css: &'static str| {
            block
                .find(sel)
                .map(|node| text_of(&node))
                .ok_or_else(|| missing("Address", css))
        };
        let street = part(&self.street, STREET)?;
        let locality = part(&self.locality, LOCALITY)?;
        let region = part(&self.region, REGION)?;
        let postal_code = part(&self.postal_code, POSTAL_CODE)?;
        Ok(format!("{}, {}, {} {}", street, locality, region, postal_code))
    }

    /// Every anchor under the useful-links block, numbered without gaps across list items.
    fn social_accounts(&self, root: &ElementRef<'_>, record: &mut ListingRecord) -> Result<(), FieldError> {
        let Some(container) = root.find(&self.useful_links) else {
            info!("No useful-links block found.");
            return Ok(());
        };
        let items = container.find_all(&self.list_item);
        if items.is_empty() {
            info!("Useful-links block has no list items.");
        }

        let mut count = 1;
        for item in items {
            let anchors = item.find_all(&self.anchor);
            if anchors.is_empty() {
                info!("List item without social media links.");
            }
            for anchor in anchors {
                let href = href_of(&anchor, "Social Media Account")?;
                let account = unwrap_redirect(href).unwrap_or_else(|| href.to_string());
                info!("Social Media Account ({}) found: {}", count, account);
                record.insert(format!("Social Media Account ({})", count), account);
                count += 1;
            }
        }
        Ok(())
    }

    /// A panel whose heading matches but whose list is missing marks only its own field.
    fn categories(&self, root: &ElementRef<'_>, record: &mut ListingRecord) {
        for panel in root.find_all(&self.detail_panel) {
            let heading = panel
                .find(&self.panel_heading)
                .map(|h| text_of(&h))
                .unwrap_or_default();
            let Some(category) = Category::from_heading(&heading) else {
                continue;
            };
            match self.category_values(&panel, category) {
                Ok(values) => {
                    info!("{} found: {}", category.label(), values);
                    record.insert(category.label(), values);
                }
                Err(e) => {
                    warn!("{} extraction failed: {}", category.label(), e);
                    record.insert(category.label(), NOT_AVAILABLE);
                }
            }
        }
    }

    fn category_values(&self, panel: &ElementRef<'_>, category: Category) -> Result<String, FieldError> {
        let list = panel
            .find(&self.list)
            .ok_or_else(|| missing(category.label(), LIST))?;

        let mut values: Vec<String> = Vec::new();
        for item in list.find_all(&self.list_item) {
            let text = text_of(&item);
            if category.strips_toggles() && is_toggle(&text) {
                continue;
            }
            let value = text.trim_end_matches(',').to_string();
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Ok(values.join(", "))
    }
}
