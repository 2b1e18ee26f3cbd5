use crate::data::CellId;

// Dense arena keyed by cell index. The edge mappings insert during the
// build passes and never delete.
pub struct CellMap<T> {
  entries: Vec<Option<T>>,
}

impl<T> CellMap<T> {
  pub fn with_capacity(cells: usize) -> CellMap<T> {
    let mut entries = Vec::with_capacity(cells);
    entries.resize_with(cells, || None);
    CellMap { entries }
  }

  pub fn insert(&mut self, id: CellId, value: T) -> Option<T> {
    self.entries[id.usize()].replace(value)
  }

  pub fn get(&self, id: CellId) -> Option<&T> {
    self.entries.get(id.usize()).and_then(Option::as_ref)
  }

  pub fn get_mut(&mut self, id: CellId) -> Option<&mut T> {
    self.entries.get_mut(id.usize()).and_then(Option::as_mut)
  }

  pub fn contains(&self, id: CellId) -> bool {
    self.get(id).is_some()
  }

  pub fn iter(&self) -> impl Iterator<Item = (CellId, &T)> + '_ {
    self
      .entries
      .iter()
      .enumerate()
      .filter_map(|(i, entry)| entry.as_ref().map(|value| (CellId(i), value)))
  }
}
