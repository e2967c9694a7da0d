//! Panel geometry and interaction sessions
//!
//! All panel state lives in an explicit [`PanelState`] owned by the bridge
//! instance for the tab; drag and resize handlers receive it rather than
//! reaching into ambient flags.

use crate::host::Viewport;

/// Where the panel opens.
pub const DEFAULT_X: f64 = 100.0;
pub const DEFAULT_Y: f64 = 100.0;
pub const DEFAULT_WIDTH: f64 = 400.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// Resize floor, both axes.
pub const MIN_WIDTH: f64 = 200.0;
pub const MIN_HEIGHT: f64 = 200.0;

/// Pointer-down inside this strip at the top of the panel starts a drag.
pub const HEADER_HEIGHT: f64 = 40.0;

/// Square corner region that starts a resize.
pub const RESIZE_HANDLE_SIZE: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl PanelGeometry {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// The drag-handle strip along the top edge.
    pub fn in_header(&self, px: f64, py: f64) -> bool {
        self.contains(px, py) && py < self.y + HEADER_HEIGHT
    }

    /// The bottom-right resize corner.
    pub fn in_resize_handle(&self, px: f64, py: f64) -> bool {
        px >= self.x + self.width - RESIZE_HANDLE_SIZE
            && px < self.x + self.width
            && py >= self.y + self.height - RESIZE_HANDLE_SIZE
            && py < self.y + self.height
    }
}

/// An in-progress drag: the pointer's offset from the panel origin at the
/// moment the drag started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    offset_x: f64,
    offset_y: f64,
}

impl DragSession {
    pub fn begin(geometry: &PanelGeometry, px: f64, py: f64) -> Self {
        Self {
            offset_x: px - geometry.x,
            offset_y: py - geometry.y,
        }
    }

    /// New panel origin for the current pointer position, clamped so the
    /// panel stays inside the viewport.
    pub fn drag_to(
        &self,
        geometry: &PanelGeometry,
        viewport: Viewport,
        px: f64,
        py: f64,
    ) -> (f64, f64) {
        let max_x = viewport.width - geometry.width;
        let max_y = viewport.height - geometry.height;

        let x = (px - self.offset_x).clamp(0.0, max_x.max(0.0));
        let y = (py - self.offset_y).clamp(0.0, max_y.max(0.0));
        (x, y)
    }
}

/// An in-progress resize: the panel size and pointer position at the
/// moment the resize started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    start_width: f64,
    start_height: f64,
    start_px: f64,
    start_py: f64,
}

impl ResizeSession {
    pub fn begin(geometry: &PanelGeometry, px: f64, py: f64) -> Self {
        Self {
            start_width: geometry.width,
            start_height: geometry.height,
            start_px: px,
            start_py: py,
        }
    }

    /// New panel size for the current pointer position. An axis below its
    /// floor keeps its current value rather than snapping to the floor.
    pub fn resize_to(&self, geometry: &PanelGeometry, px: f64, py: f64) -> (f64, f64) {
        let new_width = self.start_width + (px - self.start_px);
        let new_height = self.start_height + (py - self.start_py);

        let width = if new_width >= MIN_WIDTH {
            new_width
        } else {
            geometry.width
        };
        let height = if new_height >= MIN_HEIGHT {
            new_height
        } else {
            geometry.height
        };
        (width, height)
    }
}

/// The panel's ephemeral state while open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelState {
    pub geometry: PanelGeometry,
    pub drag: Option<DragSession>,
    pub resize: Option<ResizeSession>,
}
