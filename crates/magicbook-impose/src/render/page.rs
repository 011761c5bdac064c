//! Output page and document assembly

use super::text::add_standard_font;
use super::xobject::create_page_xobject;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Content and resources of one output page under construction.
#[derive(Debug, Default)]
pub struct PageContent {
    ops: String,
    xobjects: Dictionary,
    fonts: Dictionary,
}

impl PageContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw content stream operators
    pub fn push(&mut self, ops: &str) {
        self.ops.push_str(ops);
    }

    /// Register an XObject under a fresh name and return the name
    pub fn add_xobject(&mut self, id: ObjectId) -> String {
        let name = format!("P{}", self.xobjects.len());
        self.xobjects.set(name.as_bytes(), Object::Reference(id));
        name
    }

    pub fn set_font(&mut self, name: &str, id: ObjectId) {
        self.fonts.set(name.as_bytes(), Object::Reference(id));
    }
}

/// Builds a new document page by page.
pub struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    fonts: HashMap<&'static str, ObjectId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Font dictionary for a standard font, created once per document
    pub fn font(&mut self, base_font: &'static str) -> ObjectId {
        if let Some(&id) = self.fonts.get(base_font) {
            return id;
        }
        let id = add_standard_font(&mut self.doc, base_font);
        self.fonts.insert(base_font, id);
        id
    }

    /// Copy a page of `source` into this document as a Form XObject
    pub fn import_page(
        &mut self,
        source: &Document,
        page_id: ObjectId,
        cache: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<ObjectId> {
        create_page_xobject(&mut self.doc, source, page_id, cache)
    }

    /// Finish a page of the given size
    pub fn add_page(&mut self, width: f32, height: f32, content: PageContent) -> ObjectId {
        let mut resources = Dictionary::new();
        if !content.xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(content.xobjects));
        }
        if !content.fonts.is_empty() {
            resources.set("Font", Object::Dictionary(content.fonts));
        }

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.ops.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.doc.add_object(page_dict);
        self.kids.push(Object::Reference(page_id));
        page_id
    }

    /// Append an empty page
    pub fn add_blank_page(&mut self, width: f32, height: f32) -> ObjectId {
        self.add_page(width, height, PageContent::new())
    }

    /// Write the page tree and catalog
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);
        self.doc
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Size of a document's page, from its crop box
pub fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    let rect = super::xobject::page_crop_box(doc, page_id)?;
    Ok((rect.width, rect.height))
}

/// Copy every page of `source` onto new pages of the same size, untransformed.
pub fn append_document(builder: &mut DocumentBuilder, source: &Document) -> Result<()> {
    let mut cache = HashMap::new();
    for page_id in source.get_pages().into_values() {
        let crop = super::xobject::page_crop_box(source, page_id)?;
        let xobject = builder.import_page(source, page_id, &mut cache)?;
        let mut content = PageContent::new();
        let name = content.add_xobject(xobject);
        content.push(&format!(
            "q 1 0 0 1 {} {} cm /{} Do Q\n",
            -crop.x, -crop.y, name
        ));
        builder.add_page(crop.width, crop.height, content);
    }
    Ok(())
}
