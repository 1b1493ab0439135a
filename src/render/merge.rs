//! Concatenating PDF files with `lopdf`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};

use super::PdfMerger;
use crate::error::{Error, Result};

/// Merges whole documents page by page, dropping outlines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfMerger;

impl PdfMerger for LopdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        if inputs.is_empty() {
            return Err(Error::Pdf("no PDF files to merge".to_string()));
        }

        let mut documents = Vec::with_capacity(inputs.len());
        for path in inputs {
            tracing::debug!("Adding: {}", path.display());
            let doc = Document::load(path)
                .map_err(|e| Error::Pdf(format!("cannot read {}: {e}", path.display())))?;
            documents.push(doc);
        }

        let mut merged = merge_documents(documents)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }
        merged
            .save(output)
            .map_err(|e| Error::Pdf(format!("cannot write {}: {e}", output.display())))?;
        tracing::info!("Merged {} PDF files into {}", inputs.len(), output.display());
        Ok(())
    }
}

fn type_name(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Renumber every document into one object space and rebuild a single page tree.
fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    // Reading order, as `get_pages` walks the page tree.
    let mut pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        for object_id in doc.get_pages().into_values() {
            let page = doc.get_object(object_id)?.clone();
            pages.push((object_id, page));
        }
        objects.extend(doc.objects);
    }

    let mut document = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Object)> = None;
    let mut page_tree: Option<(ObjectId, Object)> = None;

    for (object_id, object) in objects {
        let kind = type_name(&object).map(<[u8]>::to_vec);
        match kind.as_deref() {
            Some(b"Catalog") => {
                let id = catalog.as_ref().map_or(object_id, |(id, _)| *id);
                catalog = Some((id, object));
            }
            Some(b"Pages") => {
                if let Ok(dictionary) = object.as_dict() {
                    let mut dictionary = dictionary.clone();
                    if let Some((_, Object::Dictionary(previous))) = &page_tree {
                        dictionary.extend(previous);
                    }
                    let id = page_tree.as_ref().map_or(object_id, |(id, _)| *id);
                    page_tree = Some((id, Object::Dictionary(dictionary)));
                }
            }
            Some(b"Page" | b"Outlines" | b"Outline") => {}
            _ => {
                document.objects.insert(object_id, object);
            }
        }
    }

    let (pages_id, pages_object) =
        page_tree.ok_or_else(|| Error::Pdf("no page tree found in inputs".to_string()))?;
    let (catalog_id, catalog_object) =
        catalog.ok_or_else(|| Error::Pdf("no catalog found in inputs".to_string()))?;

    for (object_id, page) in &pages {
        if let Ok(dictionary) = page.as_dict() {
            let mut dictionary = dictionary.clone();
            dictionary.set("Parent", pages_id);
            document.objects.insert(*object_id, Object::Dictionary(dictionary));
        }
    }

    if let Ok(dictionary) = pages_object.as_dict() {
        let mut dictionary = dictionary.clone();
        let count = i64::try_from(pages.len()).unwrap_or(i64::MAX);
        dictionary.set("Count", count);
        dictionary.set(
            "Kids",
            pages.iter().map(|(id, _)| Object::Reference(*id)).collect::<Vec<_>>(),
        );
        document.objects.insert(pages_id, Object::Dictionary(dictionary));
    }

    if let Ok(dictionary) = catalog_object.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Pages", pages_id);
        dictionary.remove(b"Outlines");
        document.objects.insert(catalog_id, Object::Dictionary(dictionary));
    }

    document.trailer.set("Root", catalog_id);
    document.max_id = u32::try_from(document.objects.len()).unwrap_or(u32::MAX);
    document.renumber_objects();
    document.compress();
    Ok(document)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use lopdf::dictionary;

    /// Write a PDF with one empty page per width. Page objects are numbered
    /// in reverse, so object order never matches reading order.
    fn write_pdf(path: &Path, widths: &[i64]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut ids: Vec<ObjectId> = widths.iter().map(|_| doc.new_object_id()).collect();
        ids.reverse();
        for (id, width) in ids.iter().zip(widths) {
            let page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(*width),
                    Object::Integer(842),
                ],
            };
            doc.objects.insert(*id, Object::Dictionary(page));
        }
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => i64::try_from(widths.len()).unwrap(),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn blank_pdf(path: &Path, count: usize) {
        write_pdf(path, &vec![595; count]);
    }

    fn page_widths(doc: &Document) -> Vec<i64> {
        doc.get_pages()
            .into_values()
            .map(|id| {
                let page = doc.get_object(id).unwrap().as_dict().unwrap();
                page.get(b"MediaBox").unwrap().as_array().unwrap()[2].as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn pages_are_concatenated() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        blank_pdf(&a, 2);
        blank_pdf(&b, 3);

        let out = dir.path().join("merged").join("book.pdf");
        LopdfMerger.merge(&[a, b], &out).unwrap();

        let merged = Document::load(&out).unwrap();
        assert_eq!(merged.get_pages().len(), 5);
    }

    #[test]
    fn pages_keep_reading_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        write_pdf(&a, &[100, 200, 300]);
        write_pdf(&b, &[400, 500]);
        assert_eq!(page_widths(&Document::load(&a).unwrap()), [100, 200, 300]);

        let out = dir.path().join("book.pdf");
        LopdfMerger.merge(&[a, b], &out).unwrap();

        assert_eq!(page_widths(&Document::load(&out).unwrap()), [100, 200, 300, 400, 500]);
    }

    #[test]
    fn empty_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LopdfMerger.merge(&[], &dir.path().join("x.pdf")).is_err());
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.pdf");
        std::fs::write(&bogus, "not a pdf").unwrap();
        assert!(LopdfMerger.merge(&[bogus], &dir.path().join("x.pdf")).is_err());
    }
}
