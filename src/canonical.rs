use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// Canonical identity of a fetchable page.
///
/// Two pages are the same iff their canonical strings are byte-equal. The
/// canonical string is the scheme and host followed by the percent-decoded
/// path; query and fragment are dropped. The encoded form, query included, is
/// kept alongside for fetching, so `/w/index.php?title=X` requests exactly
/// what was given and a decoded `?` or `#` in the path still round-trips.
#[derive(Debug, Clone)]
pub struct PageUrl {
    canonical: String,
    location: Url,
}

impl PageUrl {
    /// Canonicalize an absolute URL, such as one typed in by the operator.
    pub fn parse(absolute: &str) -> Result<Self> {
        let url = Url::parse(absolute.trim()).map_err(|e| invalid(absolute, e))?;
        Self::from_url(url, absolute)
    }

    fn from_url(mut url: Url, href: &str) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl {
                href: href.to_string(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        url.set_fragment(None);

        let path = decode_path(url.path()).map_err(|reason| Error::InvalidUrl {
            href: href.to_string(),
            reason,
        })?;
        let canonical = format!("{}{}", url.origin().ascii_serialization(), path);

        Ok(Self {
            canonical,
            location: url,
        })
    }

    /// Canonical string form, used for identity and display
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Percent-encoded URL suitable for issuing a request
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Decoded path component
    pub fn path(&self) -> &str {
        let origin_len = self.location.origin().ascii_serialization().len();
        &self.canonical[origin_len..]
    }
}

impl PartialEq for PageUrl {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for PageUrl {}

impl Hash for PageUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for PageUrl {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl Serialize for PageUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

/// Turns a raw href into a page identity by resolving it against the site origin.
///
/// Relative hrefs (`/wiki/Foo`, `Foo`, `#section`) land on the origin's host;
/// absolute ones keep their own host so the filter can reject them.
pub fn canonicalize(raw_href: &str, origin: &Url) -> Result<PageUrl> {
    let resolved = origin
        .join(raw_href.trim())
        .map_err(|e| invalid(raw_href, e))?;
    PageUrl::from_url(resolved, raw_href)
}

/// Decoded path of `href` resolved against `base`, ignoring query and fragment.
///
/// Returns `None` when the href cannot be parsed.
pub fn href_path(href: &str, base: &Url) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    decode_path(resolved.path()).ok()
}

fn decode_path(path: &str) -> std::result::Result<String, String> {
    percent_decode_str(path)
        .decode_utf8()
        .map(|p| p.into_owned())
        .map_err(|e| format!("path is not valid UTF-8 after decoding: {e}"))
}

fn invalid(href: &str, err: url::ParseError) -> Error {
    Error::InvalidUrl {
        href: href.to_string(),
        reason: err.to_string(),
    }
}
