pub const MODEL_FILE_NAME: &str = "tiny_face_detector.onnx";
/// Default fallback bundle root. No model is published here by this
/// crate; deployments host the BlazeFace export themselves and point
/// `models.fallback` (config file or `--fallback-url`) at it. Until then
/// the fallback attempt fails and only the primary location can load.
pub const MODEL_FALLBACK_URL: &str =
    "https://github.com/facecapture/models/releases/download/v0.1.0/";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const VERIFY_PATH: &str = "/api/v1/face/verify";
pub const ENROLL_PATH: &str = "/api/v1/face/me";

/// Multipart field carrying the captured frame.
pub const IMAGE_FIELD_NAME: &str = "image";
pub const DEFAULT_IMAGE_FILENAME: &str = "image.jpg";
pub const JPEG_MIME: &str = "image/jpeg";

/// Fixed JPEG quality for captured frames (0-100).
pub const JPEG_QUALITY: u8 = 92;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
