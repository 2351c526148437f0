//! Title detection on the first page.

use std::cmp::Ordering;

use crate::model::{BoundingBox, Fragment, TitleResult};
use crate::text::{char_len, clean_text};

use super::config::TitleConfig;
use super::stats::SignatureHistogram;

/// Locates the title as the dominant typography near the top of page 0.
#[derive(Debug, Clone, Default)]
pub struct TitleLocator {
    config: TitleConfig,
}

impl TitleLocator {
    pub fn new(config: TitleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TitleConfig {
        &self.config
    }

    /// Find the title group among the document's fragments.
    ///
    /// Returns [`TitleResult::empty`] when the first page has no usable text.
    pub fn locate(&self, fragments: &[Fragment]) -> TitleResult {
        let first_page: Vec<&Fragment> = fragments
            .iter()
            .filter(|f| f.page == 0 && char_len(&f.cleaned_text()) > self.config.min_text_len)
            .collect();
        if first_page.is_empty() {
            return TitleResult::empty();
        }

        let min_y = first_page
            .iter()
            .map(|f| f.bbox.y0)
            .fold(f32::INFINITY, f32::min);
        let max_y = first_page
            .iter()
            .map(|f| f.bbox.y1)
            .fold(f32::NEG_INFINITY, f32::max);
        let band_limit = min_y + (max_y - min_y) * self.config.band_ratio;

        let mut band: Vec<&Fragment> = first_page
            .iter()
            .copied()
            .filter(|f| f.bbox.y0 <= band_limit)
            .collect();
        if band.is_empty() {
            band = first_page.clone();
        }

        let histogram = SignatureHistogram::from_fragments(band.iter().copied());
        let Some(mode) = histogram.most_common() else {
            return TitleResult::empty();
        };
        let signature = mode.signature.clone();
        log::debug!("Title typography: {} ({} fragments in top band)", signature, mode.count);

        let mut lines: Vec<&Fragment> = first_page
            .into_iter()
            .filter(|f| signature.matches(f, self.config.size_tolerance))
            .collect();
        lines.sort_by(|a, b| {
            a.origin
                .y
                .partial_cmp(&b.origin.y)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.origin.x.partial_cmp(&b.origin.x).unwrap_or(Ordering::Equal))
        });

        // Only the first vertically contiguous run belongs to the title.
        let max_gap = signature.font_size * self.config.gap_multiplier;
        let mut group_len = 1;
        for pair in lines.windows(2) {
            if pair[1].origin.y - pair[0].origin.y < max_gap {
                group_len += 1;
            } else {
                break;
            }
        }
        let group = &lines[..group_len.min(lines.len())];

        let Some(first) = group.first() else {
            return TitleResult::empty();
        };
        let bbox = group
            .iter()
            .skip(1)
            .fold(first.bbox, |acc: BoundingBox, f| acc.union(&f.bbox));
        let text = group
            .iter()
            .map(|f| f.cleaned_text())
            .collect::<Vec<_>>()
            .join(" ");

        TitleResult {
            text: clean_text(&text),
            bbox: Some(bbox),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn at(page: u32, text: &str, size: f32, font: &str, x: f32, y: f32) -> Fragment {
        let width = text.len() as f32 * size * 0.5;
        Fragment::new(page, text, size, font, BoundingBox::new(x, y, x + width, y + size))
    }

    fn locate(fragments: &[Fragment]) -> TitleResult {
        TitleLocator::default().locate(fragments)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(locate(&[]), TitleResult::empty());
    }

    #[test]
    fn test_whitespace_only_first_page() {
        let fragments = vec![
            at(0, "   ", 24.0, "Bold", 72.0, 72.0),
            at(0, "ab", 24.0, "Bold", 72.0, 100.0),
            at(1, "Content on a later page", 12.0, "Regular", 72.0, 72.0),
        ];
        let title = locate(&fragments);
        assert_eq!(title.text, "");
        assert!(title.bbox.is_none());
    }

    #[test]
    fn test_multiline_title() {
        let fragments = vec![
            at(0, "A Study of", 24.0, "Bold", 72.0, 72.0),
            at(0, "Typographic Structure", 24.0, "Bold", 72.0, 102.0),
            at(0, "Jane Doe", 12.0, "Regular", 72.0, 150.0),
            at(0, "Body paragraph", 12.0, "Regular", 72.0, 700.0),
        ];
        let title = locate(&fragments);
        assert_eq!(title.text, "A Study of Typographic Structure");
        let bbox = title.bbox.unwrap();
        assert_eq!(bbox.x0, 72.0);
        assert_eq!(bbox.y0, 72.0);
        assert_eq!(bbox.y1, 126.0);
    }

    #[test]
    fn test_gap_stops_group() {
        // Same typography far below the title is not part of it.
        let fragments = vec![
            at(0, "Annual Report", 20.0, "Bold", 72.0, 80.0),
            at(0, "Appendix Overview", 20.0, "Bold", 72.0, 600.0),
            at(0, "body body body", 10.0, "Regular", 72.0, 700.0),
        ];
        assert_eq!(locate(&fragments).text, "Annual Report");
    }

    #[test]
    fn test_gap_boundary_is_strict() {
        // 2.5 x 20 = 50: a gap of exactly 50 starts a new group.
        let fragments = vec![
            at(0, "First line", 20.0, "Bold", 72.0, 100.0),
            at(0, "Second line", 20.0, "Bold", 72.0, 150.0),
            at(0, "body body body", 10.0, "Regular", 72.0, 700.0),
        ];
        assert_eq!(locate(&fragments).text, "First line");

        let fragments = vec![
            at(0, "First line", 20.0, "Bold", 72.0, 100.0),
            at(0, "Second line", 20.0, "Bold", 72.0, 149.0),
            at(0, "body body body", 10.0, "Regular", 72.0, 700.0),
        ];
        assert_eq!(locate(&fragments).text, "First line Second line");
    }

    #[test]
    fn test_mode_tie_uses_first_encountered() {
        let fragments = vec![
            at(0, "Report Title", 22.0, "Bold", 72.0, 50.0),
            at(0, "Company Name", 14.0, "Regular", 72.0, 60.0),
            at(0, "Lower text here", 10.0, "Regular", 72.0, 900.0),
        ];
        assert_eq!(locate(&fragments).text, "Report Title");
    }

    #[test]
    fn test_size_tolerance_rematch() {
        let fragments = vec![
            at(0, "Quarterly", 18.0, "Bold", 72.0, 50.0),
            at(0, "Results", 18.05, "Bold", 72.0, 72.0),
            at(0, "Other", 18.0, "Bold", 72.0, 94.0),
            at(0, "footer text line", 9.0, "Regular", 72.0, 800.0),
        ];
        assert_eq!(locate(&fragments).text, "Quarterly Results Other");
    }

    #[test]
    fn test_sorted_by_position_not_extraction_order() {
        let fragments = vec![
            at(0, "World", 24.0, "Bold", 200.0, 80.0),
            at(0, "Hello", 24.0, "Bold", 72.0, 80.0),
            at(0, "body text at the bottom", 10.0, "Regular", 72.0, 700.0),
        ];
        assert_eq!(locate(&fragments).text, "Hello World");
    }

    #[test]
    fn test_zero_band_ratio_keeps_topmost() {
        let locator = TitleLocator::new(TitleConfig::new().with_band_ratio(0.0));
        let fragments = vec![
            at(0, "Topmost", 16.0, "Bold", 72.0, 40.0),
            at(0, "Middle body", 10.0, "Regular", 72.0, 300.0),
        ];
        assert_eq!(locator.locate(&fragments).text, "Topmost");
    }

    #[test]
    fn test_empty_band_falls_back_to_page() {
        let locator = TitleLocator::new(TitleConfig::new().with_band_ratio(-1.0));
        let fragments = vec![
            at(0, "Middle body", 10.0, "Regular", 72.0, 300.0),
            at(0, "Topmost", 16.0, "Bold", 72.0, 40.0),
            at(0, "Lower body", 10.0, "Regular", 72.0, 500.0),
        ];
        // Regular wins the mode over the whole page; its lines are 200 apart.
        assert_eq!(locator.locate(&fragments).text, "Middle body");
    }

    #[test]
    fn test_custom_origin_orders_lines() {
        let fragments = vec![
            at(0, "Second", 24.0, "Bold", 72.0, 80.0).with_origin(Point::new(72.0, 110.0)),
            at(0, "First", 24.0, "Bold", 72.0, 100.0).with_origin(Point::new(72.0, 80.0)),
            at(0, "body text at the bottom", 10.0, "Regular", 72.0, 700.0),
        ];
        assert_eq!(locate(&fragments).text, "First Second");
    }
}
