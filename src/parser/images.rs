use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::Options;

static IMG_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

// .../wikipedia/commons/thumb/1/1b/Foo.jpg/60px-Foo.jpg → drop the trailing
// size segment and the /thumb component.
static THUMB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https://upload\.wikimedia\.org/wikipedia/commons)/thumb/([^/]+/[^/]+/.+)/[^/]+$")
        .unwrap()
});

/// Only anchors pointing at the media host count as image links.
const MEDIA_HOST: &str = "upload.wikimedia.org";

/// Collect image URLs from the image cell: every `<img>` source plus every
/// anchor target that resolves to the media host. Deduplicated and
/// lexicographically sorted; empty when the cell is absent.
pub fn collect(cell: Option<ElementRef<'_>>, opts: &Options) -> Vec<String> {
    let Some(cell) = cell else {
        return Vec::new();
    };

    let mut urls = BTreeSet::new();

    for img in cell.select(&IMG_SEL) {
        let src = img.value().attr("src").unwrap_or("");
        if src.is_empty() {
            continue;
        }
        urls.insert(finalize(absolutize(src, &opts.base_origin), opts));
    }

    for anchor in cell.select(&ANCHOR_SEL) {
        let href = anchor.value().attr("href").unwrap_or("");
        if href.is_empty() {
            continue;
        }
        let url = absolutize(href, &opts.base_origin);
        if url.contains(MEDIA_HOST) {
            urls.insert(finalize(url, opts));
        }
    }

    urls.into_iter().collect()
}

fn finalize(url: String, opts: &Options) -> String {
    if opts.canonical_images {
        canonical_media_url(&url)
    } else {
        url
    }
}

/// Upgrade protocol-relative and path-relative URLs to absolute ones.
fn absolutize(url: &str, base_origin: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if url.starts_with('/') {
        format!("{base_origin}{url}")
    } else {
        url.to_string()
    }
}

/// Collapse a Wikimedia thumbnail URL to its full-resolution original.
/// URLs that don't match the thumbnail pattern pass through unchanged.
pub fn canonical_media_url(url: &str) -> String {
    match THUMB_RE.captures(url) {
        Some(caps) => format!("{}/{}", &caps[1], &caps[2]),
        None => url.to_string(),
    }
}
