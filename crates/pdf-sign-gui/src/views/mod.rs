pub mod composer;
pub mod log_panel;
pub mod sign;
pub mod upload;

pub use composer::{ComposerPanel, show_composer};
pub use log_panel::show_log_panel;
pub use sign::{ComposerDrag, PageTextures, show_canvas, show_no_document, show_thumbnail_rail};
pub use upload::{UploadAction, UploadForm, show_upload};
