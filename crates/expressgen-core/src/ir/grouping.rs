use indexmap::IndexMap;
use serde::Serialize;

use super::operations::IrOperation;
use super::types::IrModule;

/// Tag used for operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// All operations sharing one URL path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathGroup<'a> {
    pub path: &'a str,
    pub operations: Vec<&'a IrOperation>,
}

/// Group operations by their URL path.
///
/// Paths appear in first-seen order and each bucket keeps the input order of
/// its operations. Nothing is filtered, deduplicated or sorted, so every
/// input operation lands in exactly one group.
pub fn group_by_path(operations: &[IrOperation]) -> Vec<PathGroup<'_>> {
    let mut groups: IndexMap<&str, Vec<&IrOperation>> = IndexMap::new();

    for op in operations {
        groups.entry(op.path.as_str()).or_default().push(op);
    }

    log::debug!(
        "grouped {} operations into {} paths",
        operations.len(),
        groups.len()
    );

    groups
        .into_iter()
        .map(|(path, operations)| PathGroup { path, operations })
        .collect()
}

/// Group operations by tag, in first-seen tag order.
///
/// An operation with several tags appears in each of their modules; untagged
/// operations go to [`DEFAULT_TAG`].
pub fn group_by_tag(operations: &[IrOperation]) -> Vec<IrModule> {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();

    for (i, op) in operations.iter().enumerate() {
        if op.tags.is_empty() {
            groups.entry(DEFAULT_TAG).or_default().push(i);
        } else {
            for tag in &op.tags {
                groups.entry(tag.as_str()).or_default().push(i);
            }
        }
    }

    groups
        .into_iter()
        .map(|(name, indices)| IrModule {
            name: name.to_string(),
            operations: indices,
        })
        .collect()
}

/// Group operations by their first tag only, in first-seen order.
///
/// Every operation lands in exactly one module, so per-tag files never
/// repeat an operation declared under several tags.
pub fn group_by_primary_tag(operations: &[IrOperation]) -> Vec<IrModule> {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (i, op) in operations.iter().enumerate() {
        groups.entry(op.primary_tag()).or_default().push(i);
    }
    groups
        .into_iter()
        .map(|(name, indices)| IrModule {
            name: name.to_string(),
            operations: indices,
        })
        .collect()
}
