//! Headless guest selector widget for booking forms.
//!
//! The production page attaches a small popup to a booking form field: two
//! counters (guests, floor 1; children, floor 0) that the visitor adjusts
//! with +/- buttons and commits into hidden form inputs with an apply
//! button. This crate reimplements that widget over an in-memory DOM so the
//! exact click-driven behavior is executable and assertable from Rust tests,
//! without a browser.
//!
//! ```
//! use guest_selector::BookingPage;
//!
//! # fn main() -> guest_selector::Result<()> {
//! let mut page = BookingPage::from_html(guest_selector::BOOKING_FORM_HTML)?;
//! page.click("#guest-display")?;
//! page.click(".increment[data-target=guest]")?;
//! page.click("#apply-guests")?;
//! page.assert_value("#id_guests", "2")?;
//! # Ok(())
//! # }
//! ```

use std::error::Error as StdError;
use std::fmt;

mod dom;
mod events;
mod geometry;
mod html;
mod page;
mod selector;
mod style;
mod widget;

#[cfg(test)]
mod tests;

pub use geometry::Rect;
pub use page::{BOOKING_FORM_HTML, BookingPage};
pub use widget::{CounterKind, WidgetIds};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    Dom(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}
