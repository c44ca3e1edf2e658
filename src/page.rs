//! Pagination engine: parameter normalization, the paged store query and the
//! page envelope handed back to callers.
//!
//! Inputs are clamped rather than rejected. The only parameter that can fail
//! validation is the sort direction, and that check happens before the store is
//! touched.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::player::{Player, PlayerStore};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;
/// Page size used when a caller pages without naming a size.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Sort property used when none is given.
pub const DEFAULT_SORT_FIELD: &str = "playerId";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  /// Parse an optional direction, treating absent or blank input as ascending.
  pub fn parse_or_default(value: Option<&str>) -> Result<Self> {
    match value {
      None => Ok(Self::Asc),
      Some(value) if value.trim().is_empty() => Ok(Self::Asc),
      Some(value) => value.parse(),
    }
  }

  pub fn as_sql(self) -> &'static str {
    match self {
      Self::Asc => "ASC",
      Self::Desc => "DESC",
    }
  }
}

impl FromStr for SortDirection {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "asc" => Ok(Self::Asc),
      "desc" => Ok(Self::Desc),
      _ => Err(Error::InvalidSortDirection(s.to_string())),
    }
  }
}

/// Normalized page request. Construction is the only place clamping happens, so a
/// `PageRequest` in hand is always within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  page: usize,
  size: usize,
  sort_field: String,
  direction: SortDirection,
}

impl PageRequest {
  pub fn new(
    page: i64,
    size: i64,
    sort_field: Option<&str>,
    direction: Option<&str>,
  ) -> Result<Self> {
    let direction = SortDirection::parse_or_default(direction)?;
    let sort_field = match sort_field {
      Some(field) if !field.trim().is_empty() => field.to_string(),
      _ => DEFAULT_SORT_FIELD.to_string(),
    };

    Ok(Self {
      page: usize::try_from(page.max(0)).unwrap_or(usize::MAX),
      size: size.clamp(1, MAX_PAGE_SIZE as i64) as usize,
      sort_field,
      direction,
    })
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn sort_field(&self) -> &str {
    &self.sort_field
  }

  pub fn direction(&self) -> SortDirection {
    self.direction
  }

  /// Index of the first element on this page.
  pub fn offset(&self) -> usize {
    self.page.saturating_mul(self.size)
  }
}

/// One page of players plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
  pub players: Vec<Player>,
  pub page: usize,
  pub size: usize,
  pub total_elements: u64,
  pub total_pages: u64,
  pub has_next: bool,
  pub has_previous: bool,
  pub first: bool,
  pub last: bool,
}

impl PageResult {
  pub fn new(players: Vec<Player>, request: &PageRequest, total_elements: u64) -> Self {
    let page = request.page();
    let size = request.size();
    let total_pages = total_elements.div_ceil(size as u64);
    let has_next = (page as u64).saturating_add(1) < total_pages;

    Self {
      players,
      page,
      size,
      total_elements,
      total_pages,
      has_next,
      has_previous: page > 0,
      first: page == 0,
      last: !has_next,
    }
  }
}

/// Runs normalized page requests against a store.
pub struct Paginator<S: PlayerStore> {
  store: Arc<S>,
}

impl<S: PlayerStore> Paginator<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  pub fn get_page(&self, request: &PageRequest) -> Result<PageResult> {
    let stored = self.store.find_page(request).map_err(|e| {
      error!(
        page = request.page(),
        size = request.size(),
        sort_by = request.sort_field(),
        "exception in paginated listing: {}",
        e
      );
      Error::retrieval("retrieve paginated players", e)
    })?;

    let result = PageResult::new(stored.players, request, stored.total_elements);
    info!(
      page = result.page,
      size = result.size,
      total_elements = result.total_elements,
      "paginated players retrieved"
    );
    Ok(result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::player::testing::FlakyStore;
  use crate::player::MemoryStore;

  fn abc() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_players([
      Player::new("A"),
      Player::new("B"),
      Player::new("C"),
    ]))
  }

  fn ids(result: &PageResult) -> Vec<&str> {
    result.players.iter().map(|p| p.player_id.as_str()).collect()
  }

  #[test]
  fn test_direction_is_case_insensitive() {
    assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
    assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
    assert_eq!("Desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
  }

  #[test]
  fn test_invalid_direction_rejected() {
    for bad in ["up", "ascending", "de sc", "-1"] {
      match bad.parse::<SortDirection>() {
        Err(Error::InvalidSortDirection(value)) => assert_eq!(value, bad),
        other => panic!("expected InvalidSortDirection for {bad}, got {other:?}"),
      }
    }
  }

  #[test]
  fn test_padded_direction_rejected() {
    for padded in [" asc", "desc ", "\tDESC\n"] {
      match PageRequest::new(0, 2, None, Some(padded)) {
        Err(Error::InvalidSortDirection(value)) => assert_eq!(value, padded),
        other => panic!("expected InvalidSortDirection for {padded:?}, got {other:?}"),
      }
    }
  }

  #[test]
  fn test_sort_field_passed_through_untrimmed() {
    let request = PageRequest::new(0, 2, Some(" lastName"), None).unwrap();
    assert_eq!(request.sort_field(), " lastName");

    let paginator = Paginator::new(abc());
    assert!(matches!(
      paginator.get_page(&request),
      Err(Error::RetrievalFailure { .. })
    ));
  }

  #[test]
  fn test_blank_inputs_use_defaults() {
    let request = PageRequest::new(0, 10, Some("  "), Some("")).unwrap();
    assert_eq!(request.sort_field(), DEFAULT_SORT_FIELD);
    assert_eq!(request.direction(), SortDirection::Asc);

    let request = PageRequest::new(0, 10, None, None).unwrap();
    assert_eq!(request.sort_field(), DEFAULT_SORT_FIELD);
    assert_eq!(request.direction(), SortDirection::Asc);
  }

  #[test]
  fn test_page_and_size_are_clamped() {
    let cases = [
      ((-5, 0), (0, 1)),
      ((0, -20), (0, 1)),
      ((3, 1000), (3, 100)),
      ((i64::MIN, i64::MAX), (0, 100)),
      ((2, 100), (2, 100)),
      ((1, 1), (1, 1)),
    ];
    for ((page, size), (want_page, want_size)) in cases {
      let request = PageRequest::new(page, size, None, None).unwrap();
      assert_eq!(request.page(), want_page, "page for {page},{size}");
      assert_eq!(request.size(), want_size, "size for {page},{size}");
    }
  }

  #[test]
  fn test_page_math_matches_flags() {
    for total in 0u64..25 {
      for size in 1i64..7 {
        let pages = total.div_ceil(size as u64);
        for page in 0..pages as i64 {
          let request = PageRequest::new(page, size, None, None).unwrap();
          let result = PageResult::new(Vec::new(), &request, total);
          let page = page as u64;
          assert_eq!(result.total_pages, pages);
          assert_eq!(result.has_next, page < pages - 1);
          assert_eq!(result.has_previous, page > 0);
          assert_eq!(result.first, page == 0);
          assert_eq!(result.last, page == pages - 1);
        }
      }
    }
  }

  #[test]
  fn test_empty_catalog_is_a_single_last_page() {
    let request = PageRequest::new(0, 10, None, None).unwrap();
    let result = PageResult::new(Vec::new(), &request, 0);
    assert_eq!(result.total_pages, 0);
    assert!(result.first);
    assert!(result.last);
    assert!(!result.has_next);
    assert!(!result.has_previous);
  }

  #[test]
  fn test_first_page_of_three() {
    let paginator = Paginator::new(abc());
    let request = PageRequest::new(0, 2, Some("id"), Some("asc")).unwrap();
    let result = paginator.get_page(&request).unwrap();
    assert_eq!(ids(&result), vec!["A", "B"]);
    assert_eq!(result.total_elements, 3);
    assert_eq!(result.total_pages, 2);
    assert!(result.has_next);
    assert!(!result.has_previous);
    assert!(result.first);
    assert!(!result.last);
  }

  #[test]
  fn test_second_page_of_three() {
    let paginator = Paginator::new(abc());
    let request = PageRequest::new(1, 2, Some("id"), Some("asc")).unwrap();
    let result = paginator.get_page(&request).unwrap();
    assert_eq!(ids(&result), vec!["C"]);
    assert!(!result.has_next);
    assert!(result.has_previous);
    assert!(result.last);
    assert!(!result.first);
  }

  #[test]
  fn test_store_failure_becomes_retrieval_failure() {
    let store = Arc::new(FlakyStore::new([Player::new("A")]));
    store.fail(true);
    let paginator = Paginator::new(Arc::clone(&store));
    let request = PageRequest::new(0, 2, None, None).unwrap();
    match paginator.get_page(&request) {
      Err(Error::RetrievalFailure { source, .. }) => {
        assert!(source.to_string().contains("unavailable"));
      }
      other => panic!("expected RetrievalFailure, got {other:?}"),
    }
  }

  #[test]
  fn test_unknown_sort_field_becomes_retrieval_failure() {
    let paginator = Paginator::new(abc());
    let request = PageRequest::new(0, 2, Some("salary"), None).unwrap();
    assert!(matches!(
      paginator.get_page(&request),
      Err(Error::RetrievalFailure { .. })
    ));
  }
}
