use crate::model::document::{Document, SortMode, StatusFilter, Theme};

pub fn set_theme(doc: &mut Document, theme: Theme) {
    doc.settings.theme = theme;
}

pub fn toggle_theme(doc: &mut Document) -> Theme {
    doc.settings.theme = doc.settings.theme.toggled();
    doc.settings.theme
}

pub fn set_status_filter(doc: &mut Document, status: StatusFilter) {
    doc.settings.status_filter = status;
}

pub fn set_sort_mode(doc: &mut Document, sort: SortMode) {
    doc.settings.sort_mode = sort;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn toggle_theme_flips_both_ways() {
        let mut doc = Document::new_default(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(toggle_theme(&mut doc), Theme::Dark);
        assert_eq!(toggle_theme(&mut doc), Theme::Light);
    }
}
