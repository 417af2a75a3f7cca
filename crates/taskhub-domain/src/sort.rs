//! Sorting parameters shared across list endpoints.

use serde::{Deserialize, Serialize};

/// Wire format: `asc` | `desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A sortable column of one entity. `Default` names the column used when
/// the caller does not pick one.
pub trait SortField: Copy + Default {
    /// Direction applied to the default column when no order is given.
    const DEFAULT_ORDER: SortOrder = SortOrder::Asc;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub order: SortOrder,
}

impl<F: SortField> Sort<F> {
    /// Fill in whatever the caller left out.
    ///
    /// Without a field the entity's default column and direction apply; an
    /// explicit field without an order sorts ascending.
    pub fn resolve(field: Option<F>, order: Option<SortOrder>) -> Self {
        match field {
            Some(field) => Self {
                field,
                order: order.unwrap_or_default(),
            },
            None => Self {
                field: F::default(),
                order: order.unwrap_or(F::DEFAULT_ORDER),
            },
        }
    }

    pub fn is_desc(&self) -> bool {
        self.order == SortOrder::Desc
    }
}

impl<F: SortField> Default for Sort<F> {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}
