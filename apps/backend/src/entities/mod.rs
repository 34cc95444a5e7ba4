pub mod group_members;
pub mod groups;

pub use group_members::Entity as GroupMembers;
pub use group_members::Model as GroupMember;
pub use groups::Entity as Groups;
pub use groups::Model as GroupRow;
