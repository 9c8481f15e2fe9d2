//! Reference resolution
//!
//! Following a reference yields the concrete node it stands for plus the
//! translation between the reference's coordinate frame and the target's.
//!
//! ## Path Algorithm
//!
//! For every hop `from -> to` of the reference chain, compute the lowest
//! common ancestor of the two nodes and the *suffixes* of both: their
//! ancestors from the parent up to, but excluding, the LCA. Per axis:
//!
//! 1. Unset translates on either suffix are defaulted to 0, owned by the id
//!    that started the resolution.
//! 2. Translates on the `from` suffix are subtracted (walking up to the LCA)
//!    and translates on the `to` suffix are added (walking back down).
//!
//! In [`ResolveMode::Read`], an axis whose target position is itself unknown
//! is skipped entirely: defaulting its translates would make an unresolved
//! position look resolved.

use super::error::SceneError;
use super::types::{Id, Offset};
use super::{ChangeKind, ScenegraphNode, Scenegraph};

/// How much a resolution is allowed to touch the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Query; only materialize axes whose target position is known
    Read,
    /// Materialize every default an upcoming write needs
    Write,
    /// Find the concrete id only; no offsets, no mutation
    Check,
}

/// Result of following a reference chain
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The concrete node at the end of the chain
    pub id: Id,
    /// Translation from the starting id's frame to the concrete node's frame
    pub offset: Offset,
}

#[derive(Debug, Clone, Copy)]
enum TranslateAxis {
    X,
    Y,
}

impl<D> Scenegraph<D> {
    /// Follow `id` to the concrete node it ultimately refers to.
    ///
    /// A concrete `id` resolves to itself with a zero offset.
    pub fn resolve(&mut self, id: &str, mode: ResolveMode) -> Result<Resolved, SceneError> {
        let _span = tracing::trace_span!("resolve", id, ?mode).entered();

        let chain = self.reference_chain(id)?;
        let target = chain.last().cloned().unwrap_or_else(|| id.to_string());
        if mode == ResolveMode::Check || chain.len() == 1 {
            return Ok(Resolved {
                id: target,
                offset: Offset::ZERO,
            });
        }

        let target_bbox = self.concrete(&target)?.bbox;
        let resolve_x = !(mode == ResolveMode::Read && target_bbox.left.is_none());
        let resolve_y = !(mode == ResolveMode::Read && target_bbox.top.is_none());

        let mut offset = Offset::ZERO;
        for hop in chain.windows(2) {
            let (from_suffix, to_suffix) = self.lca_suffixes(&hop[0], &hop[1])?;
            if resolve_x {
                offset.x += self.accumulate(id, &from_suffix, &to_suffix, TranslateAxis::X)?;
            }
            if resolve_y {
                offset.y += self.accumulate(id, &from_suffix, &to_suffix, TranslateAxis::Y)?;
            }
        }

        tracing::trace!(id, target = %target, x = offset.x, y = offset.y, "resolved reference");
        Ok(Resolved { id: target, offset })
    }

    /// The concrete id `id` refers to, without touching the store
    pub fn resolve_id(&self, id: &str) -> Result<Id, SceneError> {
        let chain = self.reference_chain(id)?;
        Ok(chain.last().cloned().unwrap_or_else(|| id.to_string()))
    }

    /// `id` followed by every node its reference chain visits, ending at a
    /// concrete node
    fn reference_chain(&self, id: &str) -> Result<Vec<Id>, SceneError> {
        let max_depth = self.config.max_reference_depth.max(1);
        let mut chain = vec![id.to_string()];
        let mut current = self.nodes.get(id).ok_or_else(|| SceneError::not_found(id))?;

        while let ScenegraphNode::Ref(r) = current {
            let from = chain.last().cloned().unwrap_or_default();
            if chain.contains(&r.ref_id) {
                chain.push(r.ref_id.clone());
                return Err(SceneError::cycle(chain));
            }
            let next = self
                .nodes
                .get(&r.ref_id)
                .ok_or_else(|| SceneError::ref_target_not_found(&from, &r.ref_id))?;
            if next.is_ref() && chain.len() >= max_depth {
                return Err(SceneError::ref_of_ref(from, &r.ref_id));
            }
            chain.push(r.ref_id.clone());
            current = next;
        }

        Ok(chain)
    }

    /// Sum the translates along one hop, defaulting unset ones to 0 on behalf
    /// of `owner`
    fn accumulate(
        &mut self,
        owner: &str,
        from_suffix: &[Id],
        to_suffix: &[Id],
        axis: TranslateAxis,
    ) -> Result<f64, SceneError> {
        let mut total = 0.0;
        for id in from_suffix {
            total -= self.materialize_translate(id, axis, owner)?;
        }
        for id in to_suffix {
            total += self.materialize_translate(id, axis, owner)?;
        }
        Ok(total)
    }

    fn materialize_translate(
        &mut self,
        id: &str,
        axis: TranslateAxis,
        owner: &str,
    ) -> Result<f64, SceneError> {
        let node = self.concrete_mut(id)?;
        let (slot, slot_owner) = match axis {
            TranslateAxis::X => (&mut node.transform.x, &mut node.transform_owners.x),
            TranslateAxis::Y => (&mut node.transform.y, &mut node.transform_owners.y),
        };

        match *slot {
            Some(value) => Ok(value),
            None => {
                *slot = Some(0.0);
                *slot_owner = Some(owner.to_string());
                self.mark(id, ChangeKind::Transform);
                Ok(0.0)
            }
        }
    }

    /// `id` and its ancestors up to the root
    fn ancestors(&self, id: &str) -> Result<Vec<Id>, SceneError> {
        let mut chain = vec![id.to_string()];
        let mut current = self.nodes.get(id).ok_or_else(|| SceneError::not_found(id))?;

        while let Some(parent) = current.parent() {
            if chain.iter().any(|c| c == parent) {
                return Err(SceneError::ParentCycle { id: id.to_string() });
            }
            chain.push(parent.to_string());
            match self.nodes.get(parent) {
                Some(node) => current = node,
                None => break,
            }
        }

        Ok(chain)
    }

    /// Lowest common ancestor of two nodes; a node counts as its own ancestor
    pub fn lowest_common_ancestor(&self, a: &str, b: &str) -> Result<Id, SceneError> {
        let chain_a = self.ancestors(a)?;
        let chain_b = self.ancestors(b)?;
        chain_b
            .into_iter()
            .find(|n| chain_a.contains(n))
            .ok_or_else(|| SceneError::NoCommonAncestor {
                a: a.to_string(),
                b: b.to_string(),
            })
    }

    /// Ancestors of `a` and of `b` strictly between each node and their LCA,
    /// nearest first
    pub fn lca_suffixes(&self, a: &str, b: &str) -> Result<(Vec<Id>, Vec<Id>), SceneError> {
        let chain_a = self.ancestors(a)?;
        let chain_b = self.ancestors(b)?;

        let Some(ib) = chain_b.iter().position(|n| chain_a.contains(n)) else {
            return Err(SceneError::NoCommonAncestor {
                a: a.to_string(),
                b: b.to_string(),
            });
        };
        let ia = chain_a
            .iter()
            .position(|n| *n == chain_b[ib])
            .unwrap_or(chain_a.len());

        let suffix_a = chain_a.iter().take(ia).skip(1).cloned().collect();
        let suffix_b = chain_b.iter().take(ib).skip(1).cloned().collect();
        Ok((suffix_a, suffix_b))
    }
}
