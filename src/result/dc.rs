use serde::{Deserialize, Serialize};

/// One page of data together with the total number of matching rows.
///
/// `total` counts every row the filter matches, ignoring the page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcDto<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> DcDto<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> DcDto<U> {
        DcDto {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for DcDto<T> {
    fn default() -> Self {
        Self::empty()
    }
}
