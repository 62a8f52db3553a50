//! Corpus loader: a directory of HTML pages becomes a [`LinkGraph`].
//!
//! Only `*.html` files directly inside the directory are pages. A page's links are the
//! `href` targets of its `<a>` tags, compared verbatim against the other file names.
//! Self-links and links to files outside the corpus are dropped.

use crate::graph::LinkGraph;
use crate::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("href pattern is a valid regex")
});

/// Load every `.html` page in `dir` and build the corpus link graph.
pub fn crawl(dir: impl AsRef<Path>) -> Result<LinkGraph<String>> {
    let dir = dir.as_ref();
    let io_err = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!("Skipping non UTF-8 file name {:?}", path);
            continue;
        };
        if !name.ends_with(".html") || !path.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let mut links = extract_links(&contents);
        links.remove(&name);
        pages.insert(name, links);
    }

    let members: BTreeSet<String> = pages.keys().cloned().collect();
    let mut dropped = 0usize;
    for links in pages.values_mut() {
        let before = links.len();
        links.retain(|l| members.contains(l));
        dropped += before - links.len();
    }

    let graph = LinkGraph::from_links(pages)?;
    tracing::info!(
        pages = graph.len(),
        links = graph.edge_count(),
        dropped_external = dropped,
        "loaded corpus from {}",
        dir.display()
    );
    Ok(graph)
}

/// Distinct `href` targets of the `<a>` tags in `html`.
pub fn extract_links(html: &str) -> BTreeSet<String> {
    HREF.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}
