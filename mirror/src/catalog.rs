//! Catalog listing scanner.
//!
//! The server publishes its artifacts as a plain HTML directory listing. The
//! scanner pulls the `href` of every anchor out of that page and keeps the
//! ones that point at artifact archives, in document order.

use crate::retry::RetryPolicy;
use crate::transfer::{NetworkError, TransferClient};
use log::debug;
use regex::Regex;
use thiserror::Error;

/// Matches an anchor's `href` attribute, quoted or bare.
const ANCHOR_HREF_PATTERN: &str =
    r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#;

const ARCHIVE_EXTENSION: &str = ".zip";

/// Errors raised while building the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The anchor pattern failed to compile.
    #[error("invalid listing pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The listing page could not be fetched.
    #[error("cannot fetch catalog listing: {0}")]
    Fetch(#[from] NetworkError),
}

/// One artifact link found in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Last path segment of the link.
    pub filename: String,
    /// The link as written in the listing.
    pub href: String,
}

impl CatalogEntry {
    /// Build an entry from a link, taking the filename from its last path
    /// segment.
    #[must_use]
    pub fn from_href(href: impl Into<String>) -> Self {
        let href = href.into();
        let filename = href.rsplit('/').next().unwrap_or_default().to_owned();
        Self { filename, href }
    }
}

/// Extracts artifact links from listing HTML.
#[derive(Debug, Clone)]
pub struct ListingScanner {
    anchor: Regex,
    prefix: String,
}

impl ListingScanner {
    /// Create a scanner that keeps archives whose filename starts with
    /// `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Pattern`] if the anchor pattern cannot be
    /// compiled.
    pub fn new(prefix: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            anchor: Regex::new(ANCHOR_HREF_PATTERN)?,
            prefix: prefix.to_owned(),
        })
    }

    /// Return the artifact entries linked from `html`, in document order.
    ///
    /// # Examples
    ///
    /// ```
    /// use modpack_mirror::catalog::ListingScanner;
    ///
    /// let scanner = ListingScanner::new("Modpack").expect("valid pattern");
    /// let html = r#"<a href="Modpack-1-20.zip">x</a> <a href="notes.txt">y</a>"#;
    /// let entries = scanner.scan(html);
    /// assert_eq!(entries.len(), 1);
    /// assert_eq!(entries[0].filename, "Modpack-1-20.zip");
    /// ```
    #[must_use]
    pub fn scan(&self, html: &str) -> Vec<CatalogEntry> {
        self.anchor
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|href| href.as_str().trim().replace("&amp;", "&"))
            .filter(|href| self.is_artifact_link(href))
            .map(CatalogEntry::from_href)
            .collect()
    }

    fn is_artifact_link(&self, href: &str) -> bool {
        if !href.ends_with(ARCHIVE_EXTENSION) {
            return false;
        }
        href.rsplit('/')
            .next()
            .is_some_and(|name| name.starts_with(self.prefix.as_str()))
    }
}

/// Scan `html` for artifacts whose filename starts with `prefix`.
///
/// # Errors
///
/// Returns [`CatalogError::Pattern`] if the anchor pattern cannot be
/// compiled.
pub fn scan_listing(html: &str, prefix: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    Ok(ListingScanner::new(prefix)?.scan(html))
}

/// Fetch the listing at `base_url` and return its artifact entries.
///
/// # Errors
///
/// Returns [`CatalogError::Fetch`] when every attempt to fetch the listing
/// fails.
pub fn fetch_catalog(
    client: &dyn TransferClient,
    retry: &RetryPolicy,
    base_url: &str,
    scanner: &ListingScanner,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let body = retry.run("fetch catalog listing", || client.get(base_url))?;
    let html = String::from_utf8_lossy(&body);
    let entries = scanner.scan(&html);
    debug!("listing at {base_url} links {} artifact(s)", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::MockTransferClient;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn scanner() -> ListingScanner {
        ListingScanner::new("Minecraft-Mod-Language-Modpack").expect("valid pattern")
    }

    const LISTING: &str = r#"
        <html><body>
        <h1>Index of /</h1>
        <a href="../">../</a>
        <a href="Minecraft-Mod-Language-Modpack.zip">Minecraft-Mod-Language-Modpack.zip</a>
        <a href="1.12.2.md5">1.12.2.md5</a>
        <a class="file" href='Minecraft-Mod-Language-Modpack-1-20-Fabric.zip'>fabric</a>
        <A HREF=/files/Minecraft-Mod-Language-Modpack-1-16-5.zip>1.16.5</A>
        <a href="Other-Pack-1-20.zip">other</a>
        <a name="anchor-only">no link</a>
        </body></html>
    "#;

    #[rstest]
    fn scan_keeps_prefixed_archives_in_order(scanner: ListingScanner) {
        let filenames: Vec<String> = scanner
            .scan(LISTING)
            .into_iter()
            .map(|entry| entry.filename)
            .collect();
        assert_eq!(
            filenames,
            vec![
                "Minecraft-Mod-Language-Modpack.zip",
                "Minecraft-Mod-Language-Modpack-1-20-Fabric.zip",
                "Minecraft-Mod-Language-Modpack-1-16-5.zip",
            ]
        );
    }

    #[rstest]
    fn scan_preserves_href_paths(scanner: ListingScanner) {
        let entries = scanner.scan(LISTING);
        let nested = entries.last().expect("three entries");
        assert_eq!(nested.href, "/files/Minecraft-Mod-Language-Modpack-1-16-5.zip");
        assert_eq!(nested.filename, "Minecraft-Mod-Language-Modpack-1-16-5.zip");
    }

    #[rstest]
    fn scan_keeps_unparsable_prefixed_names(scanner: ListingScanner) {
        let html = r#"<a href="Minecraft-Mod-Language-Modpack-beta.zip">beta</a>"#;
        assert_eq!(scanner.scan(html).len(), 1);
    }

    #[rstest]
    fn scan_decodes_ampersand_entities(scanner: ListingScanner) {
        let html =
            r#"<a href="https://cdn.test/a&amp;b/Minecraft-Mod-Language-Modpack-1-20.zip">x</a>"#;
        let entries = scanner.scan(html);
        assert_eq!(
            entries.first().map(|entry| entry.href.as_str()),
            Some("https://cdn.test/a&b/Minecraft-Mod-Language-Modpack-1-20.zip")
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_anchors("<p>nothing here</p>")]
    #[case::data_attribute(r#"<a data-href="Minecraft-Mod-Language-Modpack-1-20.zip">x</a>"#)]
    fn scan_finds_nothing(scanner: ListingScanner, #[case] html: &str) {
        assert!(scanner.scan(html).is_empty());
    }

    #[test]
    fn scan_listing_uses_custom_prefix() {
        let entries = scan_listing(r#"<a href="Modpack-1-20.zip">x</a>"#, "Modpack")
            .expect("valid pattern");
        assert_eq!(entries, vec![CatalogEntry::from_href("Modpack-1-20.zip")]);
    }

    #[rstest]
    fn fetch_catalog_reads_listing_from_base_url(scanner: ListingScanner) {
        let mut client = MockTransferClient::new();
        client
            .expect_get()
            .with(eq("http://example.test/"))
            .times(1)
            .returning(|_| Ok(LISTING.as_bytes().to_vec()));

        let entries = fetch_catalog(
            &client,
            &RetryPolicy::default(),
            "http://example.test/",
            &scanner,
        )
        .expect("catalog");
        assert_eq!(entries.len(), 3);
    }

    #[rstest]
    fn fetch_catalog_fails_after_retries(scanner: ListingScanner) {
        let mut client = MockTransferClient::new();
        client.expect_get().times(2).returning(|url| {
            Err(NetworkError::Transport {
                url: url.to_owned(),
                reason: "connection refused".to_owned(),
            })
        });

        let err = fetch_catalog(
            &client,
            &RetryPolicy::default(),
            "http://example.test/",
            &scanner,
        )
        .expect_err("unreachable");
        assert!(matches!(
            err,
            CatalogError::Fetch(NetworkError::RetriesExhausted { attempts: 2, .. })
        ));
    }
}
