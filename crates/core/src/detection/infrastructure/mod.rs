mod math;
pub mod onnx_tiny_face_detector;
