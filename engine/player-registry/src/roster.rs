//! The user's roster with hard per-position caps

use player_analytics::{Player, Position, RosterLimits};

use crate::types::{RegistryError, Result};

/// Rostered player ids with their positions, in insertion order
#[derive(Debug, Clone, Default)]
pub struct Roster {
    limits: RosterLimits,
    members: Vec<(String, Position)>,
}

impl Roster {
    pub fn new(limits: RosterLimits) -> Self {
        Self { limits, members: Vec::new() }
    }

    pub fn limits(&self) -> &RosterLimits {
        &self.limits
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.members.iter().any(|(id, _)| id == player_id)
    }

    pub fn count(&self, position: Position) -> usize {
        self.members.iter().filter(|(_, pos)| *pos == position).count()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(id, _)| id.as_str())
    }

    /// Add a player, rejecting duplicates and positions already at the cap
    pub fn add(&mut self, player: &Player) -> Result<()> {
        if self.contains(&player.player_id) {
            return Err(RegistryError::AlreadyOnRoster(player.player_id.clone()));
        }

        let limit = self.limits.get(player.position);
        if self.count(player.position) >= limit {
            return Err(RegistryError::PositionLimitReached { position: player.position, limit });
        }

        self.members.push((player.player_id.clone(), player.position));
        Ok(())
    }

    /// Follow a position change of a rostered player. Fails without changing
    /// anything when the new position is already at its cap.
    pub fn reposition(&mut self, player_id: &str, position: Position) -> Result<()> {
        let Some(index) = self.members.iter().position(|(id, _)| id == player_id) else {
            return Ok(());
        };
        if self.members[index].1 == position {
            return Ok(());
        }

        let limit = self.limits.get(position);
        if self.count(position) >= limit {
            return Err(RegistryError::PositionLimitReached { position, limit });
        }

        self.members[index].1 = position;
        Ok(())
    }

    pub fn remove(&mut self, player_id: &str) -> Result<()> {
        let index = self
            .members
            .iter()
            .position(|(id, _)| id == player_id)
            .ok_or_else(|| RegistryError::NotOnRoster(player_id.to_string()))?;
        self.members.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kicker(id: &str) -> Player {
        Player::new(id, format!("Kicker {id}"), "TST", Position::K)
    }

    #[test]
    fn test_add_and_remove() {
        let mut roster = Roster::new(RosterLimits::default());
        roster.add(&kicker("k1")).unwrap();

        assert!(roster.contains("k1"));
        assert_eq!(roster.count(Position::K), 1);

        roster.remove("k1").unwrap();
        assert!(roster.is_empty());
        assert!(matches!(roster.remove("k1"), Err(RegistryError::NotOnRoster(_))));
    }

    #[test]
    fn test_cap_is_enforced() {
        let mut roster = Roster::new(RosterLimits::default());
        roster.add(&kicker("k1")).unwrap();

        assert!(matches!(
            roster.add(&kicker("k2")),
            Err(RegistryError::PositionLimitReached { position: Position::K, limit: 1 })
        ));
        assert!(matches!(roster.add(&kicker("k1")), Err(RegistryError::AlreadyOnRoster(_))));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_reposition_moves_the_count() {
        let mut roster = Roster::new(RosterLimits::default());
        roster.add(&kicker("k1")).unwrap();

        roster.reposition("k1", Position::Te).unwrap();
        assert_eq!(roster.count(Position::K), 0);
        assert_eq!(roster.count(Position::Te), 1);
        roster.add(&kicker("k2")).unwrap();

        // not rostered: nothing to track
        roster.reposition("k9", Position::Qb).unwrap();
        assert_eq!(roster.count(Position::Qb), 0);
    }

    #[test]
    fn test_reposition_into_full_position_is_rejected() {
        let mut roster = Roster::new(RosterLimits::default());
        roster.add(&kicker("k1")).unwrap();
        roster.add(&Player::new("te1", "Tight End", "TST", Position::Te)).unwrap();

        assert!(matches!(
            roster.reposition("te1", Position::K),
            Err(RegistryError::PositionLimitReached { position: Position::K, limit: 1 })
        ));
        assert_eq!(roster.count(Position::Te), 1);
    }

    #[test]
    fn test_zero_limit_blocks_position() {
        let mut limits = RosterLimits::default();
        limits.k = 0;
        let mut roster = Roster::new(limits);

        assert!(roster.add(&kicker("k1")).is_err());
    }
}
