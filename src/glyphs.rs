use std::ops::RangeInclusive;
use std::path::Path;

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

use crate::error::ExtractError;
use crate::model::{Glyph, PageGlyphs};

/// Records every rendered character with its page position.
#[derive(Debug, Default)]
struct GlyphCollector {
    pages: Vec<PageGlyphs>,
    page_top: f64,
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page_top = media_box.ury;
        self.pages.push(PageGlyphs {
            page_number: page_num,
            glyphs: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        _width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let Some(page) = self.pages.last_mut() else {
            return Ok(());
        };
        // trm maps text space to user space; m31/m32 hold the baseline origin.
        let height = font_size * trm.m22.abs();
        page.glyphs.push(Glyph::new(
            char,
            trm.m31,
            self.page_top - (trm.m32 + height),
        ));
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Collects positioned glyphs for the pages in `pages`.
pub(crate) fn read_page_glyphs(
    input_pdf: &Path,
    pages: &RangeInclusive<u32>,
) -> Result<Vec<PageGlyphs>, ExtractError> {
    let document = pdf_extract::Document::load(input_pdf)
        .map_err(|error| ExtractError::PdfExtract(error.to_string()))?;

    let mut collector = GlyphCollector::default();
    pdf_extract::output_doc(&document, &mut collector)
        .map_err(|error| ExtractError::PdfExtract(error.to_string()))?;

    Ok(collector
        .pages
        .into_iter()
        .filter(|page| pages.contains(&page.page_number))
        .collect())
}
