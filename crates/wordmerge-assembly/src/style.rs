use wordmerge_core::config_file::TitleConfig;
use wordmerge_ooxml::{Alignment, Paragraph, RgbColor, Run};

pub const DEFAULT_TITLE_SIZE_PT: f32 = 16.0;
pub const DEFAULT_TITLE_COLOR: RgbColor = RgbColor(0x8B, 0x5A, 0x2B);

/// Formatting of the title paragraph opening each merged section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleStyle {
    pub size_pt: f32,
    pub bold: bool,
    pub color: RgbColor,
    pub alignment: Alignment,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            size_pt: DEFAULT_TITLE_SIZE_PT,
            bold: true,
            color: DEFAULT_TITLE_COLOR,
            alignment: Alignment::Center,
        }
    }
}

impl TitleStyle {
    /// Apply the configured overrides. Values that do not parse keep their
    /// default and are reported at `warn`.
    pub fn from_config(config: &TitleConfig) -> Self {
        let mut style = Self::default();

        if let Some(size) = config.font_size_pt {
            if size.is_finite() && size > 0.0 {
                style.size_pt = size;
            } else {
                tracing::warn!(size, "ignoring invalid title font size");
            }
        }
        if let Some(bold) = config.bold {
            style.bold = bold;
        }
        if let Some(color) = config.color.as_deref() {
            match RgbColor::from_hex(color) {
                Some(c) => style.color = c,
                None => tracing::warn!(color, "ignoring invalid title color"),
            }
        }
        if let Some(alignment) = config.alignment.as_deref() {
            match Alignment::parse(alignment) {
                Some(a) => style.alignment = a,
                None => tracing::warn!(alignment, "ignoring invalid title alignment"),
            }
        }

        style
    }

    pub fn paragraph(&self, title: &str) -> Paragraph {
        let mut paragraph = Paragraph::new();
        paragraph.align(self.alignment).add_run(
            Run::new(title)
                .bold(self.bold)
                .size_pt(self.size_pt)
                .color(self.color),
        );
        paragraph
    }
}
