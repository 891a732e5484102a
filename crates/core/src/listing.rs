//! Client-side list presentation: fuzzy filtering, sorting, pagination and CSV export.
//!
//! Every list endpoint returns its full result set, so all of this runs over rows already in
//! memory. Export always serialises the loaded rows, never just the filtered or paged subset.

use std::cmp::Ordering;

use crate::constants::{DEFAULT_PAGE_SIZE, SIMILARITY_THRESHOLD};
use crate::repositories::{Record, Repository};
use crate::{LimsError, LimsResult};

/// A row type that can be shown in a table.
///
/// `cells` must line up with `headers`; it feeds sorting and export.
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;

    /// Text the filter matches against. Defaults to the visible cells.
    fn search_cells(&self) -> Vec<String> {
        self.cells()
    }
}

/// How well a cell matches a filter query, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    NoMatch,
    /// Query characters appear in order.
    Matches,
    /// A word is within a typo of the query.
    Similar,
    Acronym,
    Contains,
    WordStartsWith,
    StartsWith,
    Equal,
    CaseSensitiveEqual,
}

fn acronym(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter_map(|word| word.chars().next())
        .collect()
}

fn is_subsequence(haystack: &str, needle: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|n| chars.any(|h| h == n))
}

fn is_similar(cell: &str, query: &str) -> bool {
    if query.chars().count() < 3 {
        return false;
    }
    strsim::jaro_winkler(cell, query) >= SIMILARITY_THRESHOLD
        || cell
            .split_whitespace()
            .any(|word| strsim::jaro_winkler(word, query) >= SIMILARITY_THRESHOLD)
}

/// Ranks one cell against a query. An empty query matches everything.
pub fn rank_item(cell: &str, query: &str) -> MatchRank {
    let query = query.trim();
    if query.is_empty() {
        return MatchRank::Matches;
    }
    if cell == query {
        return MatchRank::CaseSensitiveEqual;
    }

    let cell = cell.to_lowercase();
    let query = query.to_lowercase();

    if cell == query {
        return MatchRank::Equal;
    }
    if cell.starts_with(&query) {
        return MatchRank::StartsWith;
    }
    if cell.contains(&format!(" {query}")) {
        return MatchRank::WordStartsWith;
    }
    if cell.contains(&query) {
        return MatchRank::Contains;
    }
    if query.chars().count() == 1 {
        return MatchRank::NoMatch;
    }
    if acronym(&cell).contains(&query) {
        return MatchRank::Acronym;
    }
    if is_similar(&cell, &query) {
        return MatchRank::Similar;
    }
    if is_subsequence(&cell, &query) {
        return MatchRank::Matches;
    }
    MatchRank::NoMatch
}

/// Best rank of a row over all of its columns.
pub fn rank_row<T: Tabular>(row: &T, query: &str) -> MatchRank {
    row.search_cells()
        .iter()
        .map(|cell| rank_item(cell, query))
        .max()
        .unwrap_or(MatchRank::NoMatch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line(fields: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    fields
        .into_iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// In-memory table state for one screen.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    rows: Vec<T>,
    query: String,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            query: String::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<T: Tabular> ListView<T> {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Replaces the loaded rows wholesale.
    pub fn load(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.clamp_page();
    }

    /// Refetches the full list.
    ///
    /// A failed read degrades to an empty table and returns a notice for the user.
    pub async fn refresh<R>(&mut self, repo: &R) -> Option<Notice>
    where
        T: Record,
        R: Repository<T> + ?Sized,
    {
        match repo.list().await {
            Ok(rows) => {
                self.load(rows);
                None
            }
            Err(e) => {
                tracing::warn!("failed to load {} list: {:?}", T::KIND, e);
                self.load(Vec::new());
                Some(Notice::error(format!("Failed to load {} list", T::KIND)))
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 0;
    }

    /// Sorts by the named column; sorting the same column again flips the direction.
    pub fn sort_by(&mut self, header: &str) -> LimsResult<()> {
        let column = T::headers()
            .iter()
            .position(|h| h.eq_ignore_ascii_case(header))
            .ok_or_else(|| LimsError::InvalidInput(format!("unknown column: {header}")))?;

        let direction = match self.sort {
            Some(SortSpec {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec { column, direction });
        Ok(())
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Rows passing the filter, in sort order (load order when unsorted).
    pub fn visible(&self) -> Vec<&T> {
        let query = self.query.trim();
        let mut visible: Vec<&T> = if query.is_empty() {
            self.rows.iter().collect()
        } else {
            self.rows
                .iter()
                .filter(|row| rank_row(*row, query) > MatchRank::NoMatch)
                .collect()
        };

        if let Some(spec) = self.sort {
            visible.sort_by(|a, b| {
                let a = a.cells().get(spec.column).cloned().unwrap_or_default();
                let b = b.cells().get(spec.column).cloned().unwrap_or_default();
                let ord = compare_cells(&a, &b);
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        visible
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        let visible = self.visible().len();
        visible.div_ceil(self.page_size).max(1)
    }

    /// Moves to `page` (zero based), clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.page > last {
            self.page = last;
        }
    }

    pub fn page_rows(&self) -> Vec<&T> {
        self.visible()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// CSV of every loaded row, header first, ignoring filter, sort and page.
    pub fn export_csv(&self) -> String {
        let mut out = csv_line(T::headers());
        out.push('\n');
        for row in &self.rows {
            out.push_str(&csv_line(row.cells()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use crate::repositories::{AuditLog, InMemoryRepository};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Species {
        code: String,
        name: String,
    }

    impl Tabular for Species {
        fn headers() -> Vec<&'static str> {
            vec!["Code", "Name"]
        }

        fn cells(&self) -> Vec<String> {
            vec![self.code.clone(), self.name.clone()]
        }
    }

    fn species(code: &str, name: &str) -> Species {
        Species {
            code: code.into(),
            name: name.into(),
        }
    }

    fn three_species() -> ListView<Species> {
        let mut view = ListView::default();
        view.load(vec![
            species("RAT", "Rattus norvegicus"),
            species("MUS", "Mus musculus"),
            species("CAV", "Cavia porcellus"),
        ]);
        view
    }

    #[test]
    fn ranks_follow_match_quality() {
        assert_eq!(rank_item("Wistar", "Wistar"), MatchRank::CaseSensitiveEqual);
        assert_eq!(rank_item("Wistar", "wistar"), MatchRank::Equal);
        assert_eq!(rank_item("Wistar Han", "wis"), MatchRank::StartsWith);
        assert_eq!(rank_item("Wistar Han", "han"), MatchRank::WordStartsWith);
        assert_eq!(rank_item("Wistar", "sta"), MatchRank::Contains);
        assert_eq!(rank_item("Sprague Dawley", "sd"), MatchRank::Acronym);
        assert_eq!(rank_item("Haematology", "haematolgy"), MatchRank::Similar);
        assert_eq!(rank_item("Biochemistry", "bchm"), MatchRank::Matches);
        assert_eq!(rank_item("Biochemistry", "x"), MatchRank::NoMatch);
        assert_eq!(rank_item("Biochemistry", "zzzz"), MatchRank::NoMatch);
    }

    #[test]
    fn filter_matches_any_column() {
        let mut view = three_species();
        view.set_filter("musculus");
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].code, "MUS");

        view.set_filter("cav");
        assert_eq!(view.visible()[0].name, "Cavia porcellus");
    }

    #[test]
    fn export_ignores_filter() {
        let mut view = three_species();
        view.set_filter("Mus");
        assert_eq!(view.visible().len(), 1);

        let csv = view.export_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Code,Name");
        assert_eq!(lines[1], "RAT,Rattus norvegicus");
    }

    #[test]
    fn export_quotes_special_characters() {
        let mut view = ListView::default();
        view.load(vec![species("A,1", "say \"hi\"")]);
        let csv = view.export_csv();
        assert_eq!(csv.lines().nth(1), Some("\"A,1\",\"say \"\"hi\"\"\""));
    }

    #[test]
    fn paginates_with_default_page_size() {
        let mut view = ListView::default();
        view.load(
            (0..23)
                .map(|i| species(&format!("S{i:02}"), "strain"))
                .collect(),
        );
        assert_eq!(view.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.page_rows().len(), 10);

        view.set_page(2);
        assert_eq!(view.page_rows().len(), 3);
        assert_eq!(view.page_rows()[0].code, "S20");

        view.set_page(99);
        assert_eq!(view.page(), 2);

        view.set_filter("S0");
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn sorting_toggles_direction_and_compares_numbers() {
        let mut view = ListView::default();
        view.load(vec![species("10", "b"), species("9", "a"), species("100", "c")]);

        view.sort_by("code").expect("known column");
        let codes: Vec<&str> = view.visible().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["9", "10", "100"]);

        view.sort_by("Code").expect("known column");
        let codes: Vec<&str> = view.visible().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["100", "10", "9"]);

        assert!(view.sort_by("Weight").is_err());
    }

    #[tokio::test]
    async fn refetch_is_idempotent() {
        let rows: Vec<Sample> = (1..=4)
            .map(|i| {
                serde_json::from_value(json!({
                    "sampleId": format!("S{i}"),
                    "name": format!("Subject {i}"),
                }))
                .expect("sample")
            })
            .collect();
        let repo = InMemoryRepository::with_rows(rows, Arc::new(AuditLog::default()));

        let mut view = ListView::default();
        assert!(view.refresh(&repo).await.is_none());
        let first: Vec<String> = view.rows().iter().map(|s| s.sample_id.clone()).collect();
        assert!(view.refresh(&repo).await.is_none());
        let second: Vec<String> = view.rows().iter().map(|s| s.sample_id.clone()).collect();

        assert_eq!(first, vec!["S1", "S2", "S3", "S4"]);
        assert_eq!(first, second);
    }
}
