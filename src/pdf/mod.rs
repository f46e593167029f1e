//! PDF access
//!
//! `PdfLoader` opens raw bytes into a `PageSource`, which yields a page's text
//! layer or a rasterized PNG of it. The MuPDF implementation lives in
//! `handler`; text acquisition only sees the traits.

mod handler;
mod raster;
mod traits;

pub use handler::{MuPdfLoader, PdfDocumentHandler};
pub use traits::{PageSource, PdfLoader};
