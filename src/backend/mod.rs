//! Concrete sink implementations and async delivery machinery.

pub mod async_writer;
pub mod codec;
pub mod console;
pub mod file;

pub use async_writer::AsyncWriter;
pub use console::{ConsoleSink, Stream};
pub use file::FileSink;
