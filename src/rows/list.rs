use crate::models::{RowId, RowKind, RowRecord};

/// Ordered mirror of one row container.
///
/// Placeholder numbers come from the length at creation time and are never
/// recomputed, so removing a middle row leaves a gap that the next addition
/// can duplicate. That matches what users of the edit form already see.
#[derive(Clone, Debug)]
pub(crate) struct RowList {
    kind: RowKind,
    rows: Vec<RowRecord>,
}

impl RowList {
    pub fn new(kind: RowKind) -> Self {
        Self { kind, rows: vec![] }
    }

    pub fn kind(&self) -> RowKind {
        self.kind
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn next_number(&self) -> usize {
        self.rows.len() + 1
    }

    /// Track a row that was already on the page.
    pub fn adopt_existing(&mut self) -> RowRecord {
        let record = RowRecord {
            id: RowId::next(),
            kind: self.kind,
            number: None,
        };
        self.rows.push(record.clone());
        record
    }

    pub fn push_new(&mut self) -> RowRecord {
        let record = RowRecord {
            id: RowId::next(),
            kind: self.kind,
            number: Some(self.next_number()),
        };
        self.rows.push(record.clone());
        record
    }

    pub fn remove(&mut self, id: RowId) -> Option<RowRecord> {
        let idx = self.position(id)?;
        Some(self.rows.remove(idx))
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &RowRecord> {
        self.rows.iter()
    }
}

/// Both containers' lists, shared by every add/remove handler on the page.
#[derive(Clone, Debug, Default)]
pub(crate) struct RowRegistry {
    lists: Vec<RowList>,
}

impl RowRegistry {
    pub fn insert(&mut self, list: RowList) {
        self.lists.retain(|l| l.kind() != list.kind());
        self.lists.push(list);
    }

    #[cfg(test)]
    pub fn get(&self, kind: RowKind) -> Option<&RowList> {
        self.lists.iter().find(|l| l.kind() == kind)
    }

    pub fn get_mut(&mut self, kind: RowKind) -> Option<&mut RowList> {
        self.lists.iter_mut().find(|l| l.kind() == kind)
    }

    /// Drop `id` from whichever list holds it.
    pub fn remove(&mut self, id: RowId) -> Option<RowRecord> {
        self.lists.iter_mut().find_map(|l| l.remove(id))
    }
}
