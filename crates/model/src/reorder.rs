use crate::{
    error::{Error, Result},
    question::Question,
};
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Target position of a question among the other questions of its quiz.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    First,
    Last,
    /// Immediately before the question with the given ID.
    Above(String),
    /// Immediately after the question with the given ID.
    Below(String),
}

/// Outcome of [`place`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reorder {
    /// Only the moved question takes a new order.
    Moved(f64),
    /// The neighbours leave no gap between them, so the whole quiz is renumbered
    /// from `1.0`. Pairs every question ID with its new order, in final sequence.
    Respaced(Vec<(String, f64)>),
}

/// Computes where `target` lands at `placement` among `siblings`. The target
/// itself may appear in `siblings`; it is ignored there. Siblings are ranked by
/// order and then by ID, the same way the stores list them.
pub fn place(target: &Question, siblings: &[Question], placement: &Placement) -> Result<Reorder> {
    let mut others: Vec<_> = siblings
        .iter()
        .filter(|sibling| sibling.id != target.id)
        .map(|sibling| (sibling.id.as_str(), sibling.order))
        .collect();
    others.sort_by(|(a_id, a), (b_id, b)| a.total_cmp(b).then_with(|| a_id.cmp(b_id)));

    let slot = match placement {
        Placement::First => 0,
        Placement::Last => others.len(),
        Placement::Above(anchor) | Placement::Below(anchor) => {
            if *anchor == target.id {
                return Err(Error::SelfAnchor);
            }
            let index = others.iter().position(|&(id, _)| id == anchor.as_str()).ok_or(Error::UnknownAnchor)?;
            if matches!(placement, Placement::Above(_)) {
                index
            } else {
                index + 1
            }
        }
    };

    let prev = slot.checked_sub(1).and_then(|index| others.get(index)).map(|&(_, order)| order);
    let next = others.get(slot).map(|&(_, order)| order);
    let order = match (prev, next) {
        (Some(prev), Some(next)) => (prev + next) / 2.0,
        (Some(prev), None) => prev + 1.0,
        (None, Some(next)) => next - 1.0,
        (None, None) => return Ok(Reorder::Moved(target.order)),
    };

    // Ties are broken by ID, so only a strictly intermediate order is enough.
    if prev.map_or(true, |prev| prev < order) && next.map_or(true, |next| order < next) {
        return Ok(Reorder::Moved(order));
    }

    let mut sequence: Vec<_> = others.iter().map(|&(id, _)| id).collect();
    sequence.insert(slot, target.id.as_str());
    let orders = sequence.into_iter().zip(1u32..).map(|(id, rank)| (String::from(id), f64::from(rank))).collect();
    Ok(Reorder::Respaced(orders))
}
