//! Planned actions and their validation

use std::fmt;

use crate::config::ActionConfig;
use crate::error::{GlobeError, Result};
use crate::regions::RegionId;

use super::{PlayerId, RegionGameData};

/// What a planned action does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Send troops into one of your own regions
    Move,
    /// Send population into one of your own regions
    Settle,
    /// Send troops against another player's region
    Attack,
}

impl ActionKind {
    /// Whether the action spends troops (as opposed to population)
    pub fn uses_military(self) -> bool {
        matches!(self, ActionKind::Move | ActionKind::Attack)
    }

    /// Default share of the source's troops or population committed
    pub fn default_proportion(self, config: &ActionConfig) -> f64 {
        match self {
            ActionKind::Move => config.move_proportion,
            ActionKind::Settle => config.settle_proportion,
            ActionKind::Attack => config.attack_proportion,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Move => "move",
            ActionKind::Settle => "settle",
            ActionKind::Attack => "attack",
        };
        f.write_str(name)
    }
}

/// An order to be carried out on the next turn
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedAction {
    pub player: PlayerId,
    pub kind: ActionKind,
    pub from: RegionId,
    pub to: RegionId,
    /// Troops (move, attack) or population (settle) committed
    pub amount: f64,
}

/// Whole troops or people committed by default from `source`
pub fn default_amount(kind: ActionKind, source: &RegionGameData, config: &ActionConfig) -> f64 {
    let pool = if kind.uses_military() {
        source.military_size
    } else {
        source.population
    };
    (pool * kind.default_proportion(config)).floor().max(0.0)
}

/// Check an action against the current owners and what is already committed
///
/// `committed` is the amount the same player already planned out of the
/// source region from the same pool (troops or population).
pub fn validate_action(
    action: &PlannedAction,
    source: &RegionGameData,
    target: &RegionGameData,
    committed: f64,
) -> Result<()> {
    if action.from == action.to {
        return Err(GlobeError::InvalidAction(format!(
            "{} from region {} into itself",
            action.kind, action.from
        )));
    }
    if !action.amount.is_finite() || action.amount <= 0.0 {
        return Err(GlobeError::InvalidAction(format!(
            "{} amount must be positive (got {})",
            action.kind, action.amount
        )));
    }
    if source.owner != action.player {
        return Err(GlobeError::InvalidAction(format!(
            "player {} does not own region {}",
            action.player, action.from
        )));
    }

    match action.kind {
        ActionKind::Move | ActionKind::Settle if target.owner != action.player => {
            return Err(GlobeError::InvalidAction(format!(
                "cannot {} into region {} owned by player {}",
                action.kind, action.to, target.owner
            )));
        }
        ActionKind::Attack if target.owner == action.player => {
            return Err(GlobeError::InvalidAction(format!(
                "player {} already owns region {}",
                action.player, action.to
            )));
        }
        _ => {}
    }

    let available = if action.kind.uses_military() {
        source.military_size
    } else {
        source.population
    };
    if committed + action.amount > available {
        return Err(GlobeError::InvalidAction(format!(
            "region {} has {:.0} available but {:.0} would be committed",
            action.from,
            available,
            committed + action.amount
        )));
    }

    Ok(())
}
