//! Score decoding and non-maximum suppression shared by detection backends.

use crate::detection::domain::detection::{FaceBox, RawDetection};

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Greedy NMS: keeps the highest-scoring box of every cluster whose IoU
/// exceeds `iou_thresh`. Output is sorted by descending score.
pub fn nms(mut dets: Vec<RawDetection>, iou_thresh: f64) -> Vec<RawDetection> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<RawDetection> = Vec::with_capacity(dets.len());
    for det in dets {
        let candidate = as_box(&det);
        let suppressed = keep
            .iter()
            .any(|k| as_box(k).iou(&candidate) > iou_thresh);
        if !suppressed {
            keep.push(det);
        }
    }
    keep
}

fn as_box(det: &RawDetection) -> FaceBox {
    FaceBox::new(det.x, det.y, det.width, det.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f64, y: f64, size: f64, score: f64) -> RawDetection {
        RawDetection {
            x,
            y,
            width: size,
            height: size,
            score,
        }
    }

    #[test]
    fn test_sigmoid_zero() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sigmoid_saturates() {
        assert!((sigmoid(10.0) - 1.0).abs() < 0.001);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn test_nms_suppresses_overlap() {
        let kept = nms(vec![det(5.0, 5.0, 100.0, 0.7), det(0.0, 0.0, 100.0, 0.9)], 0.3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].score, 0.9);
    }

    #[test]
    fn test_nms_keeps_separate_boxes() {
        let kept = nms(vec![det(0.0, 0.0, 50.0, 0.9), det(200.0, 200.0, 50.0, 0.8)], 0.3);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_nms_empty() {
        assert!(nms(Vec::new(), 0.3).is_empty());
    }
}
