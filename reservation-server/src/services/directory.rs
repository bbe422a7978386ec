//! Member Directory

use async_trait::async_trait;
use dashmap::DashMap;

use shared::models::Member;
use shared::util::now_millis;

use crate::db::{RepoError, RepoResult};

/// Member lookup collaborator.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// `NotFound` when the member is absent or inactive.
    async fn find_by_id(&self, member_id: i64) -> RepoResult<Member>;
}

/// In-memory member directory.
#[derive(Default)]
pub struct MemoryMemberDirectory {
    members: DashMap<i64, Member>,
}

impl MemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member and return it.
    pub fn insert(&self, id: i64, name: impl Into<String>) -> Member {
        let now = now_millis();
        let member = Member {
            id,
            name: name.into(),
            phone: None,
            email: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.members.insert(id, member.clone());
        member
    }
}

#[async_trait]
impl MemberDirectory for MemoryMemberDirectory {
    async fn find_by_id(&self, member_id: i64) -> RepoResult<Member> {
        self.members
            .get(&member_id)
            .filter(|m| m.is_active)
            .map(|m| m.clone())
            .ok_or_else(|| RepoError::NotFound(format!("Member {}", member_id)))
    }
}
