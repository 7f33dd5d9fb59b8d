pub mod origin;
pub mod upload;

pub use origin::request_base_url;
pub use upload::{extract_image_field, ImageUpload, IMAGE_FIELD};
