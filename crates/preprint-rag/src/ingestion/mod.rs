//! Turning PDFs into chunked text

mod chunker;
mod parser;

pub use chunker::TextChunker;
pub use parser::PdfParser;
