//! Embedded faces for the print encoder
//!
//! Body text is set in DejaVu Sans, embedded as TrueType. printpdf writes
//! each character as a two-byte glyph id and emits a ToUnicode map, so
//! typographic punctuation and non-Latin scripts survive intact. Widths
//! come from the face's own horizontal metrics.

use crate::error::RenderError;
use printpdf::{FontId, ParsedFont, PdfDocument, PdfWarnMsg};

const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// One parsed face and the id its text ops refer to
pub struct Face {
    font: ParsedFont,
    id: FontId,
    units_per_em: f32,
}

impl Face {
    fn parse(bytes: &[u8], name: &str) -> Result<Self, RenderError> {
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let font = ParsedFont::from_bytes(bytes, 0, &mut warnings).ok_or_else(|| {
            RenderError::EncodingFailed(format!("embedded face {} could not be parsed", name))
        })?;
        let units_per_em = f32::from(font.font_metrics.units_per_em.max(1));
        Ok(Self {
            font,
            id: FontId::new(),
            units_per_em,
        })
    }

    pub fn id(&self) -> &FontId {
        &self.id
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.font.lookup_glyph_index(c as u32).is_some()
    }

    /// Advance width of `text` at `size` points; unmapped characters take
    /// the width of `.notdef`, which is what ends up on the page
    pub fn width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.advance(c)).sum();
        units as f32 / self.units_per_em * size
    }

    /// Advance in font units. Outline-less glyphs are not in the decoded
    /// glyph table, so the space comes from the face's own space width.
    fn advance(&self, c: char) -> u32 {
        if c == ' ' {
            if let Some(space) = self.font.get_space_width() {
                return space as u32;
            }
        }
        let glyph = self.font.lookup_glyph_index(c as u32).unwrap_or(0);
        u32::from(self.font.get_horizontal_advance(glyph))
    }
}

/// Regular and bold faces
pub struct FaceSet {
    regular: Face,
    bold: Face,
}

impl FaceSet {
    pub fn load() -> Result<Self, RenderError> {
        Ok(Self {
            regular: Face::parse(REGULAR_TTF, "DejaVuSans")?,
            bold: Face::parse(BOLD_TTF, "DejaVuSans-Bold")?,
        })
    }

    pub fn face(&self, bold: bool) -> &Face {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// Add both faces to the document; text composed afterwards refers to
    /// the ids the document handed out
    pub fn register(&mut self, pdf: &mut PdfDocument) {
        self.regular.id = pdf.add_font(&self.regular.font);
        self.bold.id = pdf.add_font(&self.bold.font);
    }

    /// Characters of `text` the regular face has no glyph for
    pub fn missing<'t>(&'t self, text: &'t str) -> impl Iterator<Item = char> + 't {
        text.chars()
            .filter(|c| !c.is_whitespace() && !self.regular.has_glyph(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_load() {
        let faces = FaceSet::load().unwrap();
        assert!(faces.face(false).width("Arden", 11.0) > 0.0);
        assert_ne!(faces.face(false).id(), faces.face(true).id());
    }

    #[test]
    fn test_bold_is_wider() {
        let faces = FaceSet::load().unwrap();
        let text = "The sun rose slowly";
        assert!(faces.face(true).width(text, 11.0) > faces.face(false).width(text, 11.0));
    }

    #[test]
    fn test_typographic_punctuation_has_glyphs() {
        let faces = FaceSet::load().unwrap();
        let text = "\u{2014} \u{201c}\u{201d} \u{2018}\u{2019} \u{ab}\u{bb} \u{2026} \u{2022}";
        assert_eq!(faces.missing(text).count(), 0);
    }

    #[test]
    fn test_space_has_width() {
        let faces = FaceSet::load().unwrap();
        assert!(faces.face(false).width(" ", 10.0) > 1.0);
    }

    #[test]
    fn test_width_scales_with_size() {
        let faces = FaceSet::load().unwrap();
        let face = faces.face(false);
        let small = face.width("word", 10.0);
        let large = face.width("word", 20.0);
        assert!((large - 2.0 * small).abs() < 0.01);
    }
}
