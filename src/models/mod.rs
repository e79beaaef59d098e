pub mod paragraph;
pub mod rich_text;

pub use paragraph::{Dialog, Paragraph, Screenplay};
pub use rich_text::{bold, italic, plain, underline, RichText, Segment, Style};
