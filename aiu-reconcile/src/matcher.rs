//! Instance matching and mutation.
//!
//! Two independent rules are evaluated in one pass over an archival object's
//! instances:
//!
//! - **barcode**: an instance linked to the container of the current barcode
//!   is relinked to the container of the target barcode;
//! - **indicator**: an instance whose `indicator_2` equals the current value
//!   gets the target value.
//!
//! A rule whose two values are equal in the row is skipped entirely. Every
//! matching instance is rewritten, not only the first.

use thiserror::Error;

use aiu_aspace::ArchivalObject;
use aiu_core::{Direction, MissingTargetPolicy, WorkOrderRow};

use crate::container_index::ContainerIndex;

/// Observed before/after values for one row, plus how many instances each
/// rule rewrote. A rule that rewrote nothing reports `after == before`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mutation {
    pub barcode_before: String,
    pub barcode_after: String,
    pub indicator_before: String,
    pub indicator_after: String,
    pub barcode_rewrites: usize,
    pub indicator_rewrites: usize,
}

impl Mutation {
    pub fn changed(&self) -> bool {
        self.barcode_rewrites > 0 || self.indicator_rewrites > 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("target barcode '{barcode}' has no top container in this resource")]
    TargetNotIndexed { barcode: String },
}

/// Rewrite `snapshot` in place according to `row` read in `direction`.
///
/// With [`MissingTargetPolicy::Fail`] the snapshot is left untouched when the
/// error is returned.
pub fn apply(
    snapshot: &mut ArchivalObject,
    row: &WorkOrderRow,
    direction: Direction,
    index: &ContainerIndex,
    policy: MissingTargetPolicy,
) -> Result<Mutation, MatchError> {
    let values = row.values(direction);

    // Container relink: (current uri, replacement uri). `None` disables the rule.
    let relink: Option<(&str, Option<&str>)> = if row.barcode_changes() {
        index.uri_for(values.barcode_current).map(|current| {
            let target = match (index.uri_for(values.barcode_target), policy) {
                (Some(uri), _) => Some(uri),
                (None, MissingTargetPolicy::Unlink) => Some(""),
                (None, MissingTargetPolicy::Keep | MissingTargetPolicy::Fail) => None,
            };
            (current, target)
        })
    } else {
        None
    };

    if let Some((current, None)) = relink {
        if policy == MissingTargetPolicy::Fail && links_to(snapshot, current) {
            return Err(MatchError::TargetNotIndexed {
                barcode: values.barcode_target.to_owned(),
            });
        }
    }

    let retag = row
        .indicator_changes()
        .then_some((values.indicator_current, values.indicator_target));

    let mut barcode_rewrites = 0;
    let mut indicator_rewrites = 0;
    for (i, instance) in snapshot.instances.iter_mut().enumerate() {
        let Some(sc) = instance.sub_container.as_mut() else {
            continue;
        };

        if let Some((current, Some(target))) = relink {
            if let Some(link) = sc.top_container.as_mut().filter(|r| r.uri == current) {
                tracing::debug!("{} instance {i}: {current} -> {target:?}", snapshot.uri);
                link.uri = target.to_owned();
                barcode_rewrites += 1;
            }
        }

        if let Some((current, target)) = retag {
            if sc.indicator_2() == current {
                tracing::debug!("{} instance {i}: indicator_2 {current:?} -> {target:?}", snapshot.uri);
                sc.indicator_2 = (!target.is_empty()).then(|| target.to_owned());
                indicator_rewrites += 1;
            }
        }
    }

    let pick = |rewrites: usize, current: &str, target: &str| -> String {
        let observed = if rewrites > 0 { target } else { current };
        observed.to_owned()
    };
    Ok(Mutation {
        barcode_before: values.barcode_current.to_owned(),
        barcode_after: pick(barcode_rewrites, values.barcode_current, values.barcode_target),
        indicator_before: values.indicator_current.to_owned(),
        indicator_after: pick(
            indicator_rewrites,
            values.indicator_current,
            values.indicator_target,
        ),
        barcode_rewrites,
        indicator_rewrites,
    })
}

fn links_to(snapshot: &ArchivalObject, container_uri: &str) -> bool {
    snapshot.instances.iter().any(|inst| {
        inst.sub_container
            .as_ref()
            .and_then(|sc| sc.top_container_uri())
            == Some(container_uri)
    })
}
