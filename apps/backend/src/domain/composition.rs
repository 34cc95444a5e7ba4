//! Per-role slot accounting for a group.

use serde::{Deserialize, Serialize};

use super::roles::{Position, Role};

/// Filled concrete slots. Flex members are not counted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub tank: u8,
    pub damage: u8,
    pub support: u8,
}

impl RoleCounts {
    pub const fn new(tank: u8, damage: u8, support: u8) -> Self {
        Self {
            tank,
            damage,
            support,
        }
    }

    /// Counts for a freshly created group whose leader holds `position`.
    pub fn for_leader(position: Position) -> Self {
        let mut counts = Self::default();
        if let Some(role) = position.role() {
            counts.set(role, 1);
        }
        counts
    }

    pub const fn get(&self, role: Role) -> u8 {
        match role {
            Role::Tank => self.tank,
            Role::Damage => self.damage,
            Role::Support => self.support,
        }
    }

    fn set(&mut self, role: Role, value: u8) {
        match role {
            Role::Tank => self.tank = value,
            Role::Damage => self.damage = value,
            Role::Support => self.support = value,
        }
    }

    /// True when another member can take `role`.
    pub const fn has_room(&self, role: Role) -> bool {
        self.get(role) < role.capacity()
    }

    /// Open slots for `role`.
    pub const fn open(&self, role: Role) -> u8 {
        role.capacity().saturating_sub(self.get(role))
    }

    /// First role with room, in Tank > Damage > Support priority.
    pub fn first_open_role(&self) -> Option<Role> {
        Role::ALL.into_iter().find(|role| self.has_room(*role))
    }

    /// Any open concrete slot at all.
    pub fn has_any_room(&self) -> bool {
        self.first_open_role().is_some()
    }

    /// Sum of filled concrete slots.
    pub const fn assigned(&self) -> u8 {
        self.tank + self.damage + self.support
    }

    /// One Tank, two Damage, two Support.
    pub const fn is_complete(&self) -> bool {
        self.tank == Role::Tank.capacity()
            && self.damage == Role::Damage.capacity()
            && self.support == Role::Support.capacity()
    }

    /// No role over capacity.
    pub const fn within_capacity(&self) -> bool {
        self.tank <= Role::Tank.capacity()
            && self.damage <= Role::Damage.capacity()
            && self.support <= Role::Support.capacity()
    }

    /// Multiset of roles still missing, Tank first, then Damage, then Support.
    pub fn needed_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .flat_map(|role| std::iter::repeat(role).take(self.open(role) as usize))
            .collect()
    }

    /// Apply a delta, clamping at zero.
    pub fn apply(&self, delta: &RoleDelta) -> Self {
        let add = |v: u8, d: i8| (i16::from(v) + i16::from(d)).max(0) as u8;
        Self {
            tank: add(self.tank, delta.tank),
            damage: add(self.damage, delta.damage),
            support: add(self.support, delta.support),
        }
    }
}

/// Change to role counts and total membership issued as one store write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleDelta {
    pub tank: i8,
    pub damage: i8,
    pub support: i8,
    pub total: i8,
}

impl RoleDelta {
    fn for_role(role: Role, step: i8) -> Self {
        let mut delta = Self::default();
        match role {
            Role::Tank => delta.tank = step,
            Role::Damage => delta.damage = step,
            Role::Support => delta.support = step,
        }
        delta
    }

    /// A member taking `position` joins the group.
    pub fn join(position: Position) -> Self {
        let mut delta = position
            .role()
            .map(|role| Self::for_role(role, 1))
            .unwrap_or_default();
        delta.total = 1;
        delta
    }

    /// A member holding `position` leaves the group.
    pub fn leave(position: Position) -> Self {
        let mut delta = position
            .role()
            .map(|role| Self::for_role(role, -1))
            .unwrap_or_default();
        delta.total = -1;
        delta
    }

    /// A Flex member already counted in `total` resolves to `role`.
    pub fn resolve(role: Role) -> Self {
        Self::for_role(role, 1)
    }
}
