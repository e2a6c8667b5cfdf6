//! Fit a label into a maximum width by shrinking the font
//!
//! Letter spacing shrinks in proportion to the font size so the label keeps
//! its look at every size.

/// Smallest font size the fitter will go down to
const MIN_FONT_SIZE: f32 = 1.0;

/// Font size reduction per attempt
const FONT_STEP: f32 = 1.0;

/// Result of [`fit_text`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedText {
    pub font_size: f32,
    pub spacing: f32,
    /// Measured width and height at `font_size`
    pub size: [f32; 2],
}

impl FittedText {
    pub fn width(&self) -> f32 {
        self.size[0]
    }

    pub fn height(&self) -> f32 {
        self.size[1]
    }
}

/// Shrink `font_size` (and `spacing` with it) until `text` fits `max_width`
///
/// # Arguments
/// * `measure` - Returns `[width, height]` of text at a font size and spacing
///
/// Text that still overflows at the minimum font size is returned as is.
pub fn fit_text<M>(text: &str, font_size: f32, spacing: f32, max_width: f32, mut measure: M) -> FittedText
where
    M: FnMut(&str, f32, f32) -> [f32; 2],
{
    let input_font_size = font_size;
    let input_spacing = spacing;

    let mut font_size = font_size;
    let mut spacing = spacing;
    let mut size = measure(text, font_size, spacing);

    while size[0] > max_width && font_size > MIN_FONT_SIZE {
        font_size = (font_size - FONT_STEP).max(MIN_FONT_SIZE);
        spacing = input_spacing * (font_size / input_font_size);
        size = measure(text, font_size, spacing);
    }

    if size[0] > max_width {
        tracing::trace!("'{}' overflows {} at minimum font size", text, max_width);
    }

    FittedText { font_size, spacing, size }
}
