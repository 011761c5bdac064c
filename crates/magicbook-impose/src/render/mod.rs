//! PDF rendering helpers on top of lopdf

pub mod page;
pub mod text;
pub mod xobject;

pub use page::{DocumentBuilder, PageContent, append_document, page_size};
pub use text::{fit_text, helvetica_bold_width, pdf_string, show_text};
pub use xobject::{copy_object_deep, create_page_xobject, page_crop_box};
