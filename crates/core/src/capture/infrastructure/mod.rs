pub mod jpeg_capture_service;
pub mod still_image_source;
