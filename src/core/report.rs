//! Gamepad HID input report parsing
//! This module decodes the raw input reports sent by the gamepad into stick positions.

use serde::{Deserialize, Serialize};

/// Shortest report that is considered at all
pub const MIN_REPORT_LEN: usize = 8;

/// Reports longer than this carry an extra status byte after the button byte
pub const EXTRA_BUTTONS_THRESHOLD: usize = 9;

/// Number of bytes holding the four stick axes
pub const AXES_LEN: usize = 8;

/// Latest stick sample handed to the host loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSample {
    /// Left stick X
    pub left_x: i16,
    /// Left stick Y
    pub left_y: i16,
    /// Right stick X
    pub right_x: i16,
    /// Right stick Y
    pub right_y: i16,
    /// Connection status as seen by the connect/disconnect callbacks
    pub connected: bool,
}

/// Raw button bytes from the report header.
///
/// Kept beside the sample rather than inside it until the gamepad's button
/// layout is pinned down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportButtons {
    pub buttons: u8,
    pub extra: Option<u8>,
}

impl ReportButtons {
    /// Whether bit `index` of the main button byte is set
    pub fn is_pressed(&self, index: u8) -> bool {
        index < 8 && self.buttons & (1 << index) != 0
    }
}

/// The four stick axes of one report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Axes {
    pub left_x: i16,
    pub left_y: i16,
    pub right_x: i16,
    pub right_y: i16,
}

/// One decoded input report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadReport {
    pub buttons: ReportButtons,
    /// `None` when the report is too short to hold all four axes after the header
    pub axes: Option<Axes>,
}

impl InputSample {
    /// Overwrite the axes with those of `report`, keeping the old ones if it has none
    pub fn apply(&mut self, report: &GamepadReport) {
        if let Some(axes) = report.axes {
            self.left_x = axes.left_x;
            self.left_y = axes.left_y;
            self.right_x = axes.right_x;
            self.right_y = axes.right_y;
        }
    }
}

/// Number of header bytes in front of the axes.
///
/// Inferred from the total length only; a 9-byte report that does carry the
/// extra status byte is misread. Keep the threshold until the peripheral's
/// framing is confirmed.
pub fn header_len(report_len: usize) -> usize {
    if report_len > EXTRA_BUTTONS_THRESHOLD { 2 } else { 1 }
}

/// Reinterpret a raw little-endian axis word as signed (subtract 65536 above 32767)
pub fn axis_from_raw(raw: u16) -> i16 {
    let value = i32::from(raw);
    let signed = if value > i32::from(i16::MAX) { value - 65536 } else { value };
    signed as i16
}

fn read_axis(data: &[u8], at: usize) -> i16 {
    axis_from_raw(u16::from_le_bytes([data[at], data[at + 1]]))
}

/// Decode a raw input report.
///
/// Layout: `[buttons] [extra?] [LX lo hi] [LY lo hi] [RX lo hi] [RY lo hi]`.
/// Returns `None` for reports shorter than [`MIN_REPORT_LEN`].
pub fn parse_report(data: &[u8]) -> Option<GamepadReport> {
    if data.len() < MIN_REPORT_LEN {
        return None;
    }

    let offset = header_len(data.len());
    let buttons = ReportButtons {
        buttons: data[0],
        extra: (offset == 2).then(|| data[1]),
    };

    let axes = (data.len() >= offset + AXES_LEN).then(|| Axes {
        left_x: read_axis(data, offset),
        left_y: read_axis(data, offset + 2),
        right_x: read_axis(data, offset + 4),
        right_y: read_axis(data, offset + 6),
    });

    Some(GamepadReport { buttons, axes })
}

/// Report parser that remembers the last accepted report
#[derive(Debug, Default)]
pub struct ReportParser {
    last_report: Option<GamepadReport>,
}

impl ReportParser {
    /// Creates a new report parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses raw data from the gamepad
    pub fn parse_data(&mut self, data: &[u8]) -> Option<GamepadReport> {
        let report = parse_report(data)?;
        self.last_report = Some(report);
        Some(report)
    }

    /// Button bytes of the last accepted report
    pub fn last_buttons(&self) -> Option<ReportButtons> {
        self.last_report.map(|report| report.buttons)
    }
}
