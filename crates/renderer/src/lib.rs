//! Terminal render sink for the throughput chart.
//!
//! Draws the two stacked bands as coloured sparkline rows, scaled to the
//! session's current tier:
//!
//! ```text
//! 50.0 Mbps  R: 12.3  S: 1.2 Mbps
//! ▁▁▂▃▅▇█▆▄▃▂▁   (received band, top edge)
//! ▁▁▁▁▂▂▂▁▁▁▁▁   (sent band)
//! ```

use netmon_core::{DisplayState, MonitorError, MonitorEvent, RenderSink, Result, SeriesPoint};
use netmon_theme::{Palette, ANSI_RESET};
use parking_lot::Mutex;
use std::io::Write;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Writes one frame per tick to any `Write` target.
pub struct TerminalRenderer {
    palette: Palette,
    width:   usize,
    out:     Mutex<Box<dyn Write + Send>>,
}

impl TerminalRenderer {
    pub fn new(palette: Palette, width: usize, out: Box<dyn Write + Send>) -> Self {
        Self {
            palette,
            width: width.max(1),
            out: Mutex::new(out),
        }
    }

    pub fn stdout(palette: Palette, width: usize) -> Self {
        Self::new(palette, width, Box::new(std::io::stdout()))
    }

    /// Render a frame as text, without writing it anywhere.
    pub fn frame(&self, state: &DisplayState) -> String {
        let received = sparkline(&state.received.upper, state.scale_mbps, self.width);
        let sent = sparkline(&state.sent.upper, state.scale_mbps, self.width);
        format!(
            "{}  {}{}{ANSI_RESET}  {}{}{ANSI_RESET}\n{}{received}{ANSI_RESET}\n{}{sent}{ANSI_RESET}\n",
            state.scale_label,
            self.palette.received.ansi_fg(),
            state.received_label,
            self.palette.sent.ansi_fg(),
            state.sent_label,
            self.palette.received.ansi_fg(),
            self.palette.sent.ansi_fg(),
        )
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut out = self.out.lock();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| MonitorError::TickConsumption(format!("terminal write failed: {e}")))
    }
}

impl RenderSink for TerminalRenderer {
    fn notify(&self, event: &MonitorEvent) -> Result<()> {
        match event {
            MonitorEvent::Display(state) => self.write(&self.frame(state)),
            MonitorEvent::Failed(reason) => self.write(&format!("netmon: {reason}\n")),
            MonitorEvent::StateChanged(state) => {
                tracing::debug!("session {state}");
                Ok(())
            }
        }
    }
}

/// The newest `width` points as bar glyphs, where a full bar is `scale`.
pub fn sparkline(points: &[SeriesPoint], scale: f64, width: usize) -> String {
    let start = points.len().saturating_sub(width);
    points[start..]
        .iter()
        .map(|p| {
            let level = if scale > 0.0 { (p.y / scale).clamp(0.0, 1.0) } else { 0.0 };
            let idx = (level * (BARS.len() - 1) as f64).round() as usize;
            BARS[idx]
        })
        .collect()
}
