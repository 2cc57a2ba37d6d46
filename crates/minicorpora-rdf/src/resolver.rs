//! Zotero RDF record resolution.
//!
//! A Zotero "Export Collection → Zotero RDF" document looks like:
//! ```xml
//! <rdf:RDF xmlns:rdf="..." xmlns:bib="..." xmlns:dc="..." ...>
//!   <bib:Article rdf:about="http://zotero.org/users/1/items/ABC">
//!     <z:itemType>journalArticle</z:itemType>
//!     <dcterms:isPartOf rdf:resource="urn:issn:1234-5678"/>
//!     <bib:authors><rdf:Seq><rdf:li><foaf:Person>
//!       <foaf:surname>Smith</foaf:surname><foaf:givenName>Alice</foaf:givenName>
//!     </foaf:Person></rdf:li></rdf:Seq></bib:authors>
//!     <link:link rdf:resource="#item_42"/>
//!     <dc:subject>history</dc:subject>
//!     <dc:title>Report on X</dc:title>
//!     <dc:date>1901</dc:date>
//!   </bib:Article>
//!   <bib:Journal rdf:about="urn:issn:1234-5678"><dc:title>Annales</dc:title></bib:Journal>
//!   <z:Attachment rdf:about="#item_42">
//!     <rdf:resource rdf:resource="files/42/report.pdf"/>
//!     <dc:title>Full Text PDF</dc:title>
//!   </z:Attachment>
//! </rdf:RDF>
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use minicorpora_core::{Attachment, Item};

use crate::tree::Element;

pub const NS_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const NS_ZOTERO: &str = "http://www.zotero.org/namespaces/export#";
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const NS_BIB: &str = "http://purl.org/net/biblio#";
pub const NS_DCTERMS: &str = "http://purl.org/dc/terms/";
pub const NS_LINK: &str = "http://purl.org/rss/1.0/modules/link/";

/// Top-level bib node types that are never items on their own.
const EXCLUDED_TYPES: &[&str] = &["Memo", "Journal"];

/// Resolve every item of a parsed export, in document order.
///
/// Relative attachment references are joined onto `base_dir`.
pub fn resolve_items(root: &Element, base_dir: &Path) -> Vec<Item> {
    let attachments = attachment_table(root, base_dir);
    let titles = publication_titles(root);

    let mut items = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for node in &root.children {
        if node.ns != NS_BIB || EXCLUDED_TYPES.iter().any(|t| node.name.ends_with(t)) {
            continue;
        }
        let Some(id) = node.attr(NS_RDF, "about") else {
            tracing::warn!(element = %node.name, "skipping record without rdf:about identifier");
            continue;
        };
        if !seen.insert(id) {
            tracing::warn!(id, "skipping record with duplicate identifier");
            continue;
        }
        items.push(resolve_item(node, id, &attachments, &titles));
    }

    tracing::debug!(
        items = items.len(),
        attachments = attachments.len(),
        "resolved export records"
    );
    items
}

fn resolve_item(
    node: &Element,
    id: &str,
    attachments: &HashMap<&str, Attachment>,
    titles: &HashMap<&str, &str>,
) -> Item {
    Item {
        id: id.to_string(),
        title: child_text(node, NS_DC, "title"),
        author: person_names(node, "authors"),
        editor: person_names(node, "editors"),
        date: child_text(node, NS_DC, "date"),
        publication: publication_title(node, titles),
        tags: tags(node),
        pdfs: node
            .children_named(NS_LINK, "link")
            .filter_map(|link| link.attr(NS_RDF, "resource"))
            .filter_map(|reference| attachments.get(reference).cloned())
            .collect(),
    }
}

/// Every `z:Attachment` anywhere in the document that declares a file.
fn attachment_table<'r>(root: &'r Element, base_dir: &Path) -> HashMap<&'r str, Attachment> {
    let mut table = HashMap::new();
    for node in root.descendants_named(NS_ZOTERO, "Attachment") {
        let Some(id) = node.attr(NS_RDF, "about") else {
            continue;
        };
        let Some(file) = node
            .descendant(NS_RDF, "resource")
            .and_then(|r| r.attr(NS_RDF, "resource"))
        else {
            continue;
        };
        let title = node
            .descendant(NS_DC, "title")
            .map(|t| t.trimmed_text().to_string())
            .unwrap_or_default();
        table.insert(
            id,
            Attachment {
                path: base_dir.join(file),
                title,
            },
        );
    }
    table
}

/// Identifier → title of every titled top-level bib node, first occurrence
/// winning, for `dcterms:isPartOf rdf:resource` cross-references.
fn publication_titles(root: &Element) -> HashMap<&str, &str> {
    let mut titles = HashMap::new();
    for node in root.children.iter().filter(|n| n.ns == NS_BIB) {
        if let (Some(id), Some(title)) = (node.attr(NS_RDF, "about"), node.child(NS_DC, "title"))
        {
            titles.entry(id).or_insert(title.trimmed_text());
        }
    }
    titles
}

/// Inline `isPartOf` title first, then the cross-referenced record's title.
fn publication_title(node: &Element, titles: &HashMap<&str, &str>) -> String {
    let Some(part_of) = node.child(NS_DCTERMS, "isPartOf") else {
        return String::new();
    };
    if let Some(inline) = part_of.descendant(NS_DC, "title") {
        return inline.trimmed_text().to_string();
    }
    part_of
        .attr(NS_RDF, "resource")
        .and_then(|reference| titles.get(reference))
        .map(|t| t.to_string())
        .unwrap_or_default()
}

/// `", "`-joined names of every `foaf:Person` under `bib:<role>`.
fn person_names(node: &Element, role: &str) -> String {
    let mut names = Vec::new();
    for group in node.descendants_named(NS_BIB, role) {
        for person in group.descendants_named(NS_FOAF, "Person") {
            let given = child_text(person, NS_FOAF, "givenName");
            let surname = child_text(person, NS_FOAF, "surname");
            let full = format!("{given} {surname}").trim().to_string();
            if !full.is_empty() {
                names.push(full);
            }
        }
    }
    names.join(", ")
}

/// Subject strings in order. Automatic tags carry their value in a nested
/// `z:AutomaticTag/rdf:value`.
fn tags(node: &Element) -> Vec<String> {
    node.children_named(NS_DC, "subject")
        .filter_map(|subject| {
            let own = subject.trimmed_text();
            let tag = if own.is_empty() {
                subject.descendant(NS_RDF, "value")?.trimmed_text()
            } else {
                own
            };
            (!tag.is_empty()).then(|| tag.to_string())
        })
        .collect()
}

fn child_text(node: &Element, ns: &str, name: &str) -> String {
    node.child(ns, name)
        .map(|c| c.trimmed_text().to_string())
        .unwrap_or_default()
}
