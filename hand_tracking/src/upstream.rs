//! Upstream helper: an external process that owns the camera and the model.
//!
//! The helper (typically a small MediaPipe script) is spawned with the
//! capture size and detection thresholds on its command line and writes one
//! JSON object per captured frame to stdout:
//!
//! ```json
//! {"width": 1380, "height": 820, "hands": [[[0.51, 0.62], [0.49, 0.58], ...]]}
//! ```
//!
//! Each hand is a list of `[x, y]` pairs, normalized, in landmark order.
//! The reported size is informational; the tracker maps the normalized
//! points onto the window's own resolution.
//! A helper that hit a recoverable problem may send `"error": "..."` with no
//! hands; that frame is delivered with zero detections. End of stream or an
//! unparseable line is a frame-read failure.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};

use serde::Deserialize;

use crate::error::{Result, TrackingError};
use crate::frame::{DetectionParams, Frame, FrameSource, LandmarkProvider};
use crate::landmarks::{NormalizedHand, NormalizedPoint};

#[derive(Deserialize, Debug)]
struct UpstreamLine {
    width:  u32,
    height: u32,
    #[serde(default)]
    hands:  Vec<Vec<[f32; 2]>>,
    #[serde(default)]
    error:  Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// UpstreamSource
// ════════════════════════════════════════════════════════════════════════════

/// Frame source reading JSON lines from a helper process (or any reader).
pub struct UpstreamSource {
    child:  Option<Child>,
    reader: Box<dyn BufRead>,
    line:   String,
}

impl UpstreamSource {
    /// Spawn `command args... --width W --height H --max-hands N
    /// --detection-confidence X --tracking-confidence Y` and read its stdout.
    pub fn spawn(
        command: &str,
        args: &[String],
        params: &DetectionParams,
        (width, height): (u32, u32),
    ) -> Result<Self> {
        let argv = helper_args(args, params, width, height);
        tracing::info!("Starting upstream hand tracker: {} {}", command, argv.join(" "));

        let mut child = Command::new(command)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| TrackingError::Provider(format!("Failed to start {}: {}", command, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TrackingError::Provider("Upstream tracker has no stdout".to_string()))?;

        Ok(UpstreamSource {
            child:  Some(child),
            reader: Box::new(BufReader::new(stdout)),
            line:   String::new(),
        })
    }

    /// Read frames from an arbitrary reader (recorded sessions, tests).
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        UpstreamSource {
            child:  None,
            reader: Box::new(reader),
            line:   String::new(),
        }
    }
}

/// Helper command line: the configured `args`, then the capture size and
/// detection thresholds.
pub fn helper_args(args: &[String], params: &DetectionParams, width: u32, height: u32) -> Vec<String> {
    let mut argv = args.to_vec();
    argv.extend([
        "--width".to_string(),
        width.to_string(),
        "--height".to_string(),
        height.to_string(),
        "--max-hands".to_string(),
        params.max_hands.to_string(),
        "--detection-confidence".to_string(),
        params.detection_confidence.to_string(),
        "--tracking-confidence".to_string(),
        params.tracking_confidence.to_string(),
    ]);
    argv
}

impl FrameSource for UpstreamSource {
    fn read_frame(&mut self) -> Result<Frame> {
        self.line.clear();
        let n = self.reader.read_line(&mut self.line)?;
        if n == 0 {
            return Err(TrackingError::FrameRead("upstream tracker closed its output".to_string()));
        }

        let parsed: UpstreamLine = serde_json::from_str(self.line.trim())
            .map_err(|e| TrackingError::Protocol(format!("{}: {}", e, self.line.trim())))?;

        if let Some(err) = parsed.error {
            tracing::warn!("Upstream tracker error: {}", err);
        }

        let hands = parsed
            .hands
            .into_iter()
            .map(|pts| {
                NormalizedHand::new(pts.into_iter().map(|[x, y]| NormalizedPoint::new(x, y)).collect())
            })
            .collect();

        Ok(Frame::blank(parsed.width, parsed.height).with_upstream_hands(hands))
    }
}

impl Drop for UpstreamSource {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UpstreamLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// Provider that hands back whatever the frame producer already detected.
#[derive(Debug, Default)]
pub struct UpstreamLandmarks;

impl LandmarkProvider for UpstreamLandmarks {
    fn detect(&mut self, frame: &Frame, _params: &DetectionParams) -> Result<Vec<NormalizedHand>> {
        Ok(frame.upstream.clone().unwrap_or_default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(text: &str) -> UpstreamSource {
        UpstreamSource::from_reader(Cursor::new(text.to_string()))
    }

    #[test]
    fn reads_one_frame_per_line() {
        let hand: Vec<[f32; 2]> = vec![[0.5, 0.5]; 21];
        let line = serde_json::json!({ "width": 640, "height": 480, "hands": [hand] }).to_string();
        let mut src = source(&format!("{}\n{{\"width\":640,\"height\":480}}\n", line));

        let first = src.read_frame().unwrap();
        assert_eq!((first.width, first.height), (640, 480));
        let hands = UpstreamLandmarks.detect(&first, &DetectionParams::default()).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].landmarks.len(), 21);

        let second = src.read_frame().unwrap();
        assert!(UpstreamLandmarks.detect(&second, &DetectionParams::default()).unwrap().is_empty());
    }

    #[test]
    fn end_of_stream_is_frame_failure() {
        let mut src = source("");
        assert!(matches!(src.read_frame(), Err(TrackingError::FrameRead(_))));
    }

    #[test]
    fn malformed_line_is_protocol_error() {
        let mut src = source("not json\n");
        assert!(matches!(src.read_frame(), Err(TrackingError::Protocol(_))));
    }

    #[test]
    fn helper_error_yields_no_hands() {
        let mut src = source("{\"width\":10,\"height\":10,\"error\":\"camera busy\"}\n");
        let frame = src.read_frame().unwrap();
        assert_eq!(frame.upstream.as_deref().map(<[_]>::len), Some(0));
    }

    #[test]
    fn frames_without_upstream_yield_nothing() {
        let hands = UpstreamLandmarks.detect(&Frame::blank(1, 1), &DetectionParams::default()).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn helper_gets_size_and_thresholds() {
        let argv = helper_args(&["tools/hand_landmarks.py".to_string()], &DetectionParams::default(), 1380, 820);
        assert_eq!(
            argv,
            [
                "tools/hand_landmarks.py",
                "--width", "1380",
                "--height", "820",
                "--max-hands", "1",
                "--detection-confidence", "0.7",
                "--tracking-confidence", "0.7",
            ]
        );
    }

    #[test]
    fn small_helper_frames_map_onto_the_window() {
        use crate::tracker::HandTracker;

        let hand: Vec<[f32; 2]> = vec![[0.9, 0.5]; 21];
        let line = serde_json::json!({ "width": 640, "height": 480, "hands": [hand] }).to_string();
        let mut src = source(&format!("{}\n", line));
        let mut tracker =
            HandTracker::new(Box::new(UpstreamLandmarks), DetectionParams::default()).with_resolution(1380, 820);

        let frame = src.read_frame().unwrap();
        tracker.detect(&frame).unwrap();
        assert_eq!(tracker.gesture().fingertip_position(), Some(crate::Point::new(1242, 410)));
    }
}
