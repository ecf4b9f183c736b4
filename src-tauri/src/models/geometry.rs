/// Bounds of one attached monitor, in virtual-screen physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplayRegion {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Outer position plus inner size of a window.
///
/// `x`/`y` are `None` when the platform should pick the position (the window gets centered).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRectangle {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
}

impl WindowRectangle {
    pub fn at(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width,
            height,
        }
    }

    pub fn unpositioned(width: u32, height: u32) -> Self {
        Self {
            x: None,
            y: None,
            width,
            height,
        }
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }

    pub fn without_position(self) -> Self {
        Self::unpositioned(self.width, self.height)
    }
}

impl From<DisplayRegion> for WindowRectangle {
    fn from(region: DisplayRegion) -> Self {
        Self::at(region.x, region.y, region.width, region.height)
    }
}
