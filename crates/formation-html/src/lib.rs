#![allow(missing_docs)]

//! Generic HTML construction helpers: escaping, ordered attribute
//! serialization, tags and listings, and URL-backed asset/link builders.
//!
//! The sibling `formation` crate builds its form markup on top of these.

pub mod attrs;
pub mod escape;
pub mod html;
pub mod url;

pub use attrs::Attributes;
pub use escape::escape;
pub use html::{
    Html, HtmlBuilder, ListItem, dl, email_address, meta, obfuscate, ol, tag, tag_join, ul,
};
pub use url::UrlResolver;
