//! # Frame Timing
//!
//! Rolling frame-time statistics for the debug panel: average ms/frame, FPS,
//! min/max over the window, and how many frames were rendered or skipped.
//!
//! ## Usage
//!
//! ```rust
//! use pixelsand::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//!
//! // In the frame loop
//! monitor.begin_frame();
//! // ... render frame ...
//! monitor.end_frame();
//!
//! let metrics = monitor.metrics();
//! println!("{:.2} ms/frame", metrics.frame_time_ms);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame statistics over the current sample window
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Frames per second derived from the average frame time
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Frames submitted since startup
    pub frames_rendered: u64,
    /// Frames dropped on a recoverable error since startup
    pub frames_skipped: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            frames_rendered: 0,
            frames_skipped: 0,
        }
    }
}

/// Frame timing monitor
pub struct PerformanceMonitor {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    current_metrics: PerformanceMetrics,
    last_update: Instant,
    /// Statistics are recomputed at most this often
    update_interval: Duration,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_samples(120)
    }

    /// Monitor averaging over the last `max_samples` frames
    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
            current_metrics: PerformanceMetrics::default(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
        }
    }

    /// Mark the beginning of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a submitted frame
    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.add_frame_time(start.elapsed());
            self.current_metrics.frames_rendered += 1;

            if self.last_update.elapsed() >= self.update_interval {
                self.update_metrics();
                self.last_update = Instant::now();
            }
        }
    }

    /// Mark the current frame as dropped; its time is not sampled
    pub fn skip_frame(&mut self) {
        self.frame_start = None;
        self.current_metrics.frames_skipped += 1;
    }

    /// Adds a measured frame and recomputes the statistics immediately
    pub fn record_frame_time(&mut self, frame_time: Duration) {
        self.add_frame_time(frame_time);
        self.current_metrics.frames_rendered += 1;
        self.update_metrics();
    }

    fn add_frame_time(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Frame times in milliseconds, oldest first, for graphing
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.frame_start = None;
        self.last_update = Instant::now();
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
