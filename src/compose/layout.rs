//! Page geometry for the two card layouts.
//!
//! All values are PDF points with a bottom-left origin.

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

/// US Letter, portrait.
pub const LETTER: PageSize = PageSize { width: 612.0, height: 792.0 };

impl PageSize {
    /// The same page rotated to landscape.
    #[must_use]
    pub fn landscape(self) -> Self {
        Self { width: self.width.max(self.height), height: self.width.min(self.height) }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Placement for the half-image, half-text card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlan {
    /// Landscape letter page.
    pub page: PageSize,
    /// Image region: the whole left half, stretched.
    pub image: Rect,
    /// X of the vertical separator, spanning the full page height.
    pub separator_x: f32,
    /// Horizontal center of the greeting.
    pub greeting_center_x: f32,
    /// Greeting baseline.
    pub greeting_baseline: f32,
}

/// Placement for the single centered image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenteredPlan {
    /// Portrait letter page.
    pub page: PageSize,
    /// Image rectangle after uniform scaling.
    pub image: Rect,
}

/// Split layout. The image fills the left half regardless of its pixel size.
#[must_use]
pub fn split_plan() -> SplitPlan {
    let page = LETTER.landscape();
    let half = page.width / 2.0;
    SplitPlan {
        page,
        image: Rect { x: 0.0, y: 0.0, width: half, height: page.height },
        separator_x: half,
        greeting_center_x: page.width * 3.0 / 4.0,
        greeting_baseline: page.height / 2.0,
    }
}

/// Centered layout for a bitmap of `pixel_width` x `pixel_height`.
///
/// The image is scaled uniformly to fit the top half of a portrait page and
/// centered horizontally on the page and vertically within that half.
#[must_use]
pub fn centered_plan(pixel_width: u32, pixel_height: u32) -> CenteredPlan {
    let page = LETTER;
    let region = Rect {
        x: 0.0,
        y: page.height / 2.0,
        width: page.width,
        height: page.height / 2.0,
    };

    if pixel_width == 0 || pixel_height == 0 {
        let image = Rect {
            x: region.x + region.width / 2.0,
            y: region.y + region.height / 2.0,
            width: 0.0,
            height: 0.0,
        };
        return CenteredPlan { page, image };
    }

    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (pixel_width as f32, pixel_height as f32);
    let scale = (region.width / w).min(region.height / h);
    let (width, height) = (w * scale, h * scale);

    let image = Rect {
        x: region.x + (region.width - width) / 2.0,
        y: region.y + (region.height - height) / 2.0,
        width,
        height,
    };
    CenteredPlan { page, image }
}
