use scene::Place;
use viewer::{CategoryChip, ChipKey, PlaceRow, ViewState, detail};

/// View state with the given query and category selection applied.
///
/// An empty `categories` slice keeps every category enabled.
pub fn filtered_state(places: Vec<Place>, query: &str, categories: &[String]) -> ViewState {
    let mut state = ViewState::new();
    state.load(places);
    if !categories.is_empty() {
        state.toggle_all();
        for category in categories {
            state.toggle_category(category);
        }
    }
    state.set_query(query);
    state
}

pub fn row_line(row: &PlaceRow) -> String {
    let episode = row
        .episode
        .map(|e| format!("ep{e}"))
        .unwrap_or_else(|| "-".to_string());
    let start = row.start_label.as_deref().unwrap_or("-");
    format!(
        "{episode:<6} {start:>6}  {}  {} [{}]  ({})",
        row.color, row.name, row.category, row.id
    )
}

pub fn chip_line(chip: &CategoryChip) -> String {
    let marker = match chip.key {
        ChipKey::All => '*',
        ChipKey::Category(_) => ' ',
    };
    format!("{marker} {:>5}  {}  {}", chip.count, chip.swatch, chip.label)
}

pub fn list_lines(state: &ViewState) -> Vec<String> {
    let rows = detail::rows(state);
    if rows.is_empty() {
        return vec![detail::EMPTY_RESULTS.to_string()];
    }
    let mut out: Vec<String> = rows.iter().map(row_line).collect();
    out.push(format!("{} / {}", rows.len(), state.world().len()));
    out
}

pub fn category_lines(state: &ViewState) -> Vec<String> {
    detail::chips(state).iter().map(chip_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::{LatLon, PlaceId};
    use pretty_assertions::assert_eq;
    use scene::VideoLink;

    fn place(id: &str, category: &str, name: &str, start: Option<u64>) -> Place {
        Place {
            id: PlaceId::new(id),
            category: category.into(),
            name: name.into(),
            description: String::new(),
            position: LatLon::new(35.0, 129.0),
            video: start.map(|s| VideoLink::new("https://youtu.be/abc", Some(s))),
            frame_image: None,
        }
    }

    fn places() -> Vec<Place> {
        vec![
            place("a", "ep.2 부산", "국밥", Some(95)),
            place("b", "ep.1 서울", "냉면", None),
            place("c", "misc", "카페", None),
        ]
    }

    #[test]
    fn list_is_ordered_and_counted() {
        let state = filtered_state(places(), "", &[]);
        let lines = list_lines(&state);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("냉면"));
        assert!(lines[1].starts_with("ep2"));
        assert!(lines[1].contains("1:35"));
        assert!(lines[1].contains("#f08c00"));
        assert!(lines[2].starts_with('-'));
        assert_eq!(lines[3], "3 / 3");
    }

    #[test]
    fn category_and_query_filters_combine() {
        let state = filtered_state(places(), "", &["misc".to_string()]);
        let ids: Vec<String> = detail::rows(&state).iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["c"]);

        let state = filtered_state(places(), "없는", &[]);
        assert_eq!(list_lines(&state), vec![detail::EMPTY_RESULTS.to_string()]);
    }

    #[test]
    fn categories_start_with_the_all_chip() {
        let state = filtered_state(places(), "", &[]);
        let lines = category_lines(&state);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "*     3  #2c7a4b  전체");
        assert!(lines[1].ends_with("ep.1 서울"));
    }
}
