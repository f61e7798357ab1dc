// Uploaded source documents: raw bytes in the blob store, extracted text in
// the document collection.

pub mod blob;
pub mod handlers;
pub mod text;
