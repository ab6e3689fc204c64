//! Parsed HTML with the two marker queries the extractor needs.
//!
//! Both queries return `Option`, so an absent marker is a value the caller
//! decides about rather than a lookup fault.

use crate::extract::ExtractError;
use crate::period::PeriodToken;
use scraper::{ElementRef, Html, Selector};

pub const HEADING_SELECTOR: &str = "h2.av-special-heading-tag";
pub const SUBHEADING_SELECTOR: &str = "div.av-subheading";

/// A CSS selector identifying one kind of element on the page.
#[derive(Debug, Clone)]
pub struct Marker {
    source: String,
    selector: Selector,
}

impl Marker {
    pub fn parse(css: &str) -> Result<Self, ExtractError> {
        let selector = Selector::parse(css).map_err(|e| ExtractError::Selector {
            selector: css.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: css.to_string(),
            selector,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.selector.matches(element)
    }
}

/// Heading marker plus the subheading marker read once a heading matches.
#[derive(Debug, Clone)]
pub struct Markers {
    pub heading: Marker,
    pub subheading: Marker,
}

impl Markers {
    pub fn new(heading: &str, subheading: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            heading: Marker::parse(heading)?,
            subheading: Marker::parse(subheading)?,
        })
    }
}

impl Default for Markers {
    /// Markers for the special-heading blocks on gronskys.com.
    fn default() -> Self {
        Self::new(HEADING_SELECTOR, SUBHEADING_SELECTOR).expect("built-in selectors parse")
    }
}

/// A heading whose label named the period.
#[derive(Debug, Clone, Copy)]
pub struct Heading<'a> {
    element: ElementRef<'a>,
}

impl<'a> Heading<'a> {
    pub fn label(&self) -> String {
        normalize_ws(&self.element.text().collect::<String>())
    }
}

#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Labels of every heading candidate, in document order.
    pub fn heading_labels(&self, marker: &Marker) -> Vec<String> {
        self.html
            .select(&marker.selector)
            .map(|el| normalize_ws(&el.text().collect::<String>()))
            .collect()
    }

    /// First heading (document order) whose text contains `period`.
    pub fn find_heading(&self, marker: &Marker, period: &PeriodToken) -> Option<Heading<'_>> {
        self.html
            .select(&marker.selector)
            .find(|el| period.appears_in(&el.text().collect::<String>()))
            .map(|element| Heading { element })
    }

    /// First element matching `marker` inside `heading` or inside one of the
    /// heading's following siblings. Content in a later section of the page
    /// never counts.
    pub fn subheading_after(&self, heading: &Heading<'_>, marker: &Marker) -> Option<String> {
        let own = heading.element.descendants().skip(1);
        let following = heading
            .element
            .next_siblings()
            .flat_map(|sibling| sibling.descendants());
        own.chain(following)
            .filter_map(ElementRef::wrap)
            .find(|el| marker.matches(el))
            .map(|el| el.text().collect::<String>().trim().to_string())
    }
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div class="av-subheading">Stray before</div>
  <div class="av-special-heading">
    <h2 class="av-special-heading-tag ">
      February   Pancake
    </h2>
    <div class="av-subheading av-subheading_below"><p>Chocolate Chip</p></div>
  </div>
  <div class="av-special-heading">
    <h2 class="av-special-heading-tag ">March Pancake</h2>
    <div class="av-subheading av-subheading_below"><p>  Blueberry Delight  </p></div>
  </div>
</body></html>"#;

    #[test]
    fn heading_labels_are_whitespace_normalised() {
        let doc = Document::parse(PAGE);
        let markers = Markers::default();
        assert_eq!(
            doc.heading_labels(&markers.heading),
            vec!["February Pancake", "March Pancake"]
        );
    }

    #[test]
    fn subheading_lookup_skips_elements_before_the_heading() {
        let doc = Document::parse(PAGE);
        let markers = Markers::default();
        let heading = doc
            .find_heading(&markers.heading, &PeriodToken::new("february"))
            .unwrap();
        assert_eq!(heading.label(), "February Pancake");
        assert_eq!(
            doc.subheading_after(&heading, &markers.subheading).as_deref(),
            Some("Chocolate Chip")
        );
    }

    #[test]
    fn subheading_lookup_stays_inside_the_heading_section() {
        let doc = Document::parse(
            r#"<div><h2 class="av-special-heading-tag">March Pancake</h2></div>
               <div><h2 class="av-special-heading-tag">Store Hours</h2>
                    <div class="av-subheading">Open 7am to 3pm</div></div>"#,
        );
        let markers = Markers::default();
        let heading = doc
            .find_heading(&markers.heading, &PeriodToken::new("MARCH"))
            .unwrap();
        assert_eq!(doc.subheading_after(&heading, &markers.subheading), None);
    }

    #[test]
    fn subheading_nested_in_a_later_sibling_is_found() {
        let doc = Document::parse(
            r#"<div><h2 class="av-special-heading-tag">March</h2>
                    <div class="border"><div class="av-subheading"><p> Oatmeal </p></div></div></div>"#,
        );
        let markers = Markers::default();
        let heading = doc
            .find_heading(&markers.heading, &PeriodToken::new("MARCH"))
            .unwrap();
        assert_eq!(
            doc.subheading_after(&heading, &markers.subheading).as_deref(),
            Some("Oatmeal")
        );
    }

    #[test]
    fn class_with_trailing_space_still_matches() {
        let doc = Document::parse(r#"<h2 class="av-special-heading-tag ">April</h2>"#);
        let markers = Markers::default();
        assert!(doc
            .find_heading(&markers.heading, &PeriodToken::new("APRIL"))
            .is_some());
    }

    #[test]
    fn other_tags_with_the_class_are_not_headings() {
        let doc = Document::parse(r#"<h3 class="av-special-heading-tag">April</h3>"#);
        let markers = Markers::default();
        assert!(doc
            .find_heading(&markers.heading, &PeriodToken::new("APRIL"))
            .is_none());
    }

    #[test]
    fn invalid_selector_is_reported() {
        let err = Marker::parse("h2[").unwrap_err();
        assert!(matches!(err, ExtractError::Selector { ref selector, .. } if selector == "h2["));
    }
}
