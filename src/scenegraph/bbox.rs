//! Bounding box accessor and mutator
//!
//! Reads compose a node's stored geometry with its own translate and the
//! offset accumulated while resolving references. Writes check ownership
//! and turn position writes on positions owned by somebody else into
//! translate deltas.
//!
//! Conflicts follow two named policies:
//!
//! - [`WritePolicy::AtomicGroup`] for `width`/`height` in
//!   [`Scenegraph::set_bbox`]: one conflicting size field aborts the whole call.
//! - [`WritePolicy::PerField`] for `left`/`top`/`translate`: a conflicting field
//!   is skipped and the rest of the write proceeds.

use super::diagnostics::DiagnosticCategory;
use super::error::SceneError;
use super::ownership::Axis;
use super::resolve::{ResolveMode, Resolved};
use super::types::{maybe_add, maybe_add_all, maybe_sub, BBox, Id, Transform};
use super::{ChangeKind, Scenegraph};

/// How a write treats a conflict on one of its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// A conflict on any field of the group rejects the entire write
    AtomicGroup,
    /// A conflict rejects only that field
    PerField,
}

impl WritePolicy {
    /// Policy `set_bbox` applies to writes along `axis`
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Width | Axis::Height => WritePolicy::AtomicGroup,
            Axis::X | Axis::Y => WritePolicy::PerField,
        }
    }
}

/// Outcome of planning a `left` or `top` write
#[derive(Debug)]
enum PositionWrite {
    Untouched,
    /// The writer owns (or claims) the position itself; the node's translate
    /// is pinned to 0
    Base(f64),
    /// The writer only owns the translate; move the node by this delta
    Shift(Option<f64>),
    /// Both the position and the translate belong to others
    Dropped { value: f64, base_owner: Id, offset_owner: Id },
}

/// Outcome of claiming one stored field
enum Claim {
    Untouched,
    Written { changed: bool },
    Conflict { value: f64, holder: Id },
}

fn claimable(current: Option<&str>, owner: &str) -> bool {
    current.map_or(true, |c| c == owner)
}

fn plan_position(
    owner: &str,
    requested: Option<f64>,
    stored: Option<f64>,
    base_owner: Option<&str>,
    offset_owner: Option<&str>,
) -> PositionWrite {
    let Some(value) = requested else {
        return PositionWrite::Untouched;
    };
    if claimable(base_owner, owner) {
        PositionWrite::Base(value)
    } else if claimable(offset_owner, owner) {
        PositionWrite::Shift(maybe_sub(Some(value), stored))
    } else {
        PositionWrite::Dropped {
            value,
            base_owner: base_owner.unwrap_or_default().to_string(),
            offset_owner: offset_owner.unwrap_or_default().to_string(),
        }
    }
}

fn claim(slot: &mut Option<f64>, slot_owner: &mut Option<Id>, value: Option<f64>, owner: &str) -> Claim {
    let Some(value) = value else {
        return Claim::Untouched;
    };
    match slot_owner.as_deref() {
        Some(holder) if holder != owner => Claim::Conflict {
            value,
            holder: holder.to_string(),
        },
        _ => {
            let changed = *slot != Some(value);
            *slot = Some(value);
            *slot_owner = Some(owner.to_string());
            Claim::Written { changed }
        }
    }
}

impl<D> Scenegraph<D> {
    /// Effective bounding box of `id` as seen from its own frame.
    ///
    /// `left`/`top` are the resolved node's stored position plus its own
    /// translate plus the reference offset; any unknown term leaves the result
    /// unknown. Size is unaffected by translation.
    pub fn get_bbox(&mut self, id: &str) -> Result<BBox, SceneError> {
        let Resolved {
            id: resolved,
            offset,
        } = self.resolve(id, ResolveMode::Read)?;
        let node = self.concrete(&resolved)?;

        Ok(BBox {
            left: maybe_add_all(&[node.bbox.left, node.transform.x, Some(offset.x)]),
            top: maybe_add_all(&[node.bbox.top, node.transform.y, Some(offset.y)]),
            width: node.bbox.width,
            height: node.bbox.height,
        })
    }

    /// Write `bbox` into `id` (or the node it refers to) on behalf of `owner`.
    ///
    /// NaN values and size conflicts reject the whole call. A `left`/`top`
    /// the writer does not own is applied as a translate delta when the
    /// writer owns (or can claim) that translate, and dropped otherwise.
    pub fn set_bbox(&mut self, owner: &str, id: &str, bbox: BBox) -> Result<(), SceneError> {
        if bbox.has_nan() {
            self.report(
                DiagnosticCategory::NaN,
                format!("{owner} tried to update {id}'s bbox with {bbox:?}, but it contains NaN values; skipped"),
            );
            return Ok(());
        }

        let Resolved {
            id: resolved,
            offset,
        } = self.resolve(id, ResolveMode::Write)?;
        let node = self.concrete(&resolved)?;

        let horizontal = plan_position(
            owner,
            bbox.left,
            node.bbox.left,
            node.bbox_owners.left.as_deref(),
            node.transform_owners.x.as_deref(),
        );
        let vertical = plan_position(
            owner,
            bbox.top,
            node.bbox.top,
            node.bbox_owners.top.as_deref(),
            node.transform_owners.y.as_deref(),
        );

        let mut refusals: Vec<(Axis, String)> = Vec::new();
        for (axis, value, holder) in [
            (Axis::Width, bbox.width, node.bbox_owners.width.as_deref()),
            (Axis::Height, bbox.height, node.bbox_owners.height.as_deref()),
        ] {
            if let (Some(value), Some(holder)) = (value, holder) {
                if holder != owner {
                    refusals.push((
                        axis,
                        format!("{owner} tried to set {resolved}'s {axis} to {value}, but it is owned by {holder}"),
                    ));
                }
            }
        }
        for (axis, field, plan) in [(Axis::X, "left", &horizontal), (Axis::Y, "top", &vertical)] {
            if let PositionWrite::Dropped {
                value,
                base_owner,
                offset_owner,
            } = plan
            {
                refusals.push((
                    axis,
                    format!(
                        "{owner} tried to set {resolved}'s {field} to {value}, but the position is owned by {base_owner} and its translate by {offset_owner}"
                    ),
                ));
            }
        }

        if let Some((_, message)) = refusals
            .iter()
            .find(|(axis, _)| WritePolicy::for_axis(*axis) == WritePolicy::AtomicGroup)
        {
            self.report(
                DiagnosticCategory::Ownership,
                format!("{message}; skipped the whole update"),
            );
            return Ok(());
        }
        let refused = |axis: Axis| refusals.iter().any(|(a, _)| *a == axis);

        let mut proposed = BBox {
            width: bbox.width.filter(|_| !refused(Axis::Width)),
            height: bbox.height.filter(|_| !refused(Axis::Height)),
            ..BBox::default()
        };
        let mut local = Transform::default();
        for (plan, position, translate) in [
            (horizontal, &mut proposed.left, &mut local.x),
            (vertical, &mut proposed.top, &mut local.y),
        ] {
            match plan {
                PositionWrite::Untouched | PositionWrite::Dropped { .. } => {}
                PositionWrite::Base(value) => {
                    *position = Some(value);
                    *translate = Some(0.0);
                }
                PositionWrite::Shift(delta) => *translate = delta,
            }
        }
        for (_, message) in refusals {
            self.report(DiagnosticCategory::Ownership, format!("{message}; skipped"));
        }

        let transform = Transform {
            x: maybe_add(local.x, Some(offset.x)),
            y: maybe_add(local.y, Some(offset.y)),
        };
        self.merge_bbox_and_transform(owner, &resolved, proposed, transform)
    }

    /// Merge raw values into the concrete node `id`, recording `owner` for
    /// every field written.
    ///
    /// Only per-field ownership is checked here; `id` must already be
    /// resolved.
    pub fn merge_bbox_and_transform(
        &mut self,
        owner: &str,
        id: &str,
        bbox: BBox,
        transform: Transform,
    ) -> Result<(), SceneError> {
        let transform_nan = [transform.x, transform.y]
            .iter()
            .any(|v| v.is_some_and(f64::is_nan));
        if bbox.has_nan() || transform_nan {
            self.report(
                DiagnosticCategory::NaN,
                format!("{owner} tried to merge {bbox:?} / {transform:?} into {id}, but it contains NaN values; skipped"),
            );
            return Ok(());
        }

        let node = self.concrete_mut(id)?;
        let bbox_claims = [
            ("left", claim(&mut node.bbox.left, &mut node.bbox_owners.left, bbox.left, owner)),
            ("top", claim(&mut node.bbox.top, &mut node.bbox_owners.top, bbox.top, owner)),
            ("width", claim(&mut node.bbox.width, &mut node.bbox_owners.width, bbox.width, owner)),
            ("height", claim(&mut node.bbox.height, &mut node.bbox_owners.height, bbox.height, owner)),
        ];
        let transform_claims = [
            ("translate.x", claim(&mut node.transform.x, &mut node.transform_owners.x, transform.x, owner)),
            ("translate.y", claim(&mut node.transform.y, &mut node.transform_owners.y, transform.y, owner)),
        ];

        let mut bbox_changed = false;
        let mut transform_changed = false;
        for (is_bbox, (field, outcome)) in bbox_claims
            .into_iter()
            .map(|c| (true, c))
            .chain(transform_claims.into_iter().map(|c| (false, c)))
        {
            match outcome {
                Claim::Untouched => {}
                Claim::Written { changed } => {
                    if is_bbox {
                        bbox_changed |= changed;
                    } else {
                        transform_changed |= changed;
                    }
                }
                Claim::Conflict { value, holder } => self.report(
                    DiagnosticCategory::Ownership,
                    format!(
                        "{owner} tried to set {id}'s {field} to {value}, but it was already set by {holder}; only one component can set a property, skipped"
                    ),
                ),
            }
        }

        if bbox_changed {
            self.mark(id, ChangeKind::BBox);
        }
        if transform_changed {
            self.mark(id, ChangeKind::Transform);
        }
        tracing::trace!(owner, id, ?bbox, ?transform, "merged geometry");
        Ok(())
    }

    /// Replace the payload of `id` (or the node it refers to). Payloads are
    /// not ownership-tracked.
    pub fn set_custom_data(&mut self, id: &str, data: D) -> Result<(), SceneError> {
        let resolved = self.resolve_id(id)?;
        self.concrete_mut(&resolved)?.custom_data = Some(data);
        self.mark(&resolved, ChangeKind::CustomData);
        Ok(())
    }

    /// Payload of `id` (or the node it refers to)
    pub fn custom_data(&self, id: &str) -> Result<Option<&D>, SceneError> {
        let resolved = self.resolve_id(id)?;
        Ok(self.concrete(&resolved)?.custom_data.as_ref())
    }
}
