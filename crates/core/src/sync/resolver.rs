//! Link resolution decision table
//!
//! Pure logic deciding what to do to one external-resource link given its
//! current state and the requested change. The table is identical for all
//! three resource kinds; only the parameter builders and clients differ, so
//! the function is generic over the owner and ref types.

use gavel_domain::LinkChange;

/// Action to take on one external-resource link.
///
/// `O` is the owning scope for provisioning (account id or registry meeting
/// id); `R` is the full link ref for adoption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction<O, R> {
    /// Nothing to do.
    NoOp,
    /// Provision a brand-new resource under the owner.
    Create(O),
    /// Link to an already-existing resource, refreshing its parameters.
    AdoptAndUpdate(R),
    /// Refresh the currently linked resource's parameters.
    UpdateInPlace,
    /// Best-effort delete the linked resource and clear the link.
    Delete,
    /// Replace the linked resource with a freshly provisioned one.
    DeleteThenCreate(O),
    /// Replace the linked resource by adopting a different existing one.
    DeleteThenAdopt(R),
}

/// Decide the action for one link.
///
/// `params_dirty` reports whether any scalar meeting field feeding this
/// resource's parameters changed; it decides between `UpdateInPlace`
/// (refresh the provider copy) and `NoOp` (nothing to push) when the link
/// exists and the request leaves it alone. Requesting adoption of the ref
/// that is already linked is an in-place refresh, not a relink.
pub fn resolve_link<O, R>(
    current: Option<&R>,
    requested: &LinkChange<O, R>,
    params_dirty: bool,
) -> LinkAction<O, R>
where
    O: Clone,
    R: Clone + PartialEq,
{
    match (current, requested) {
        (None, LinkChange::Unchanged | LinkChange::Unlink) => LinkAction::NoOp,
        (None, LinkChange::ProvisionNew(owner)) => LinkAction::Create(owner.clone()),
        (None, LinkChange::Adopt(r)) => LinkAction::AdoptAndUpdate(r.clone()),
        (Some(_), LinkChange::ProvisionNew(owner)) => LinkAction::DeleteThenCreate(owner.clone()),
        (Some(cur), LinkChange::Adopt(r)) if *cur == *r => LinkAction::UpdateInPlace,
        (Some(_), LinkChange::Adopt(r)) => LinkAction::DeleteThenAdopt(r.clone()),
        (Some(_), LinkChange::Unlink) => LinkAction::Delete,
        (Some(_), LinkChange::Unchanged) => {
            if params_dirty {
                LinkAction::UpdateInPlace
            } else {
                LinkAction::NoOp
            }
        }
    }
}
