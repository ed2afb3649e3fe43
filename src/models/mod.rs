use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The two growable lists on the recipe edit form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum RowKind {
    Ingredient,
    Instruction,
}

impl RowKind {
    pub fn container_id(self) -> &'static str {
        match self {
            RowKind::Ingredient => "ingredients-container",
            RowKind::Instruction => "instructions-container",
        }
    }

    pub fn add_trigger_id(self) -> &'static str {
        match self {
            RowKind::Ingredient => "add-ingredient",
            RowKind::Instruction => "add-instruction",
        }
    }

    pub fn row_class(self) -> &'static str {
        match self {
            RowKind::Ingredient => "ingredient-row mb-2",
            RowKind::Instruction => "instruction-row mb-3",
        }
    }

    /// Form field name; the trailing `[]` makes the server collect a list.
    pub fn field_name(self) -> &'static str {
        match self {
            RowKind::Ingredient => "ingredients[]",
            RowKind::Instruction => "instructions[]",
        }
    }

    pub fn field_tag(self) -> &'static str {
        match self {
            RowKind::Ingredient => "input",
            RowKind::Instruction => "textarea",
        }
    }

    pub fn is_single_line(self) -> bool {
        matches!(self, RowKind::Ingredient)
    }

    pub fn placeholder(self, number: usize) -> String {
        match self {
            RowKind::Ingredient => format!("Ingredient {number}"),
            RowKind::Instruction => format!("Step {number}"),
        }
    }
}

/// Page-wide row identifier. Never reused, even after the row is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct RowId(u64);

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

impl RowId {
    pub fn next() -> Self {
        RowId(NEXT_ROW_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Parse the value stored in a row's `data-row-id` attribute.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u64>().ok().map(RowId)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RowRecord {
    pub id: RowId,
    pub kind: RowKind,

    /// Placeholder number given at creation. `None` for rows rendered by the server.
    pub number: Option<usize>,
}

/// Value of a form field at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldSnapshot {
    pub value: String,
}

impl FieldSnapshot {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}
