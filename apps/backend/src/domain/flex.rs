//! Flex resolution planning.
//!
//! Once a group holds five members, every unresolved Flex member is paired
//! with one missing role. The pairing is random so that no Flex player is
//! systematically handed the least popular slot; the RNG is injected so tests
//! can fix a seed.

use rand::Rng;

use super::composition::RoleCounts;
use super::group::Member;
use super::roles::Role;

/// One Flex member and the role it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexAssignment {
    pub member_id: i64,
    pub player_id: String,
    pub role: Role,
}

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Pair shuffled Flex members with the roles `counts` is still missing.
///
/// Members that are not Flex are ignored. Pairs stop at whichever of the two
/// lists runs out first.
pub fn plan_flex_resolution<R: Rng + ?Sized>(
    counts: &RoleCounts,
    members: &[Member],
    rng: &mut R,
) -> Vec<FlexAssignment> {
    let mut flex: Vec<&Member> = members.iter().filter(|m| m.position.is_flex()).collect();
    shuffle(&mut flex, rng);

    flex.into_iter()
        .zip(counts.needed_roles())
        .map(|(member, role)| FlexAssignment {
            member_id: member.id,
            player_id: member.player_id.clone(),
            role,
        })
        .collect()
}
