//! Task table for simulated users

use std::fmt;
use std::str::FromStr;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::ConfigError;

/// One randomly selectable action of a simulated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserTask {
    LoginExisting,
    RegisterNew,
    AddContact,
    FetchContacts,
    DeleteContact,
    FetchUsers,
    FetchMessages,
    DeleteConversation,
    CreateGroup,
    FetchGroups,
    AddGroupMember,
    FetchGroupMembers,
    FetchGroupMessages,
    SendGroupMessage,
    FetchGroupInfo,
}

impl UserTask {
    pub const ALL: [UserTask; 15] = [
        UserTask::LoginExisting,
        UserTask::RegisterNew,
        UserTask::AddContact,
        UserTask::FetchContacts,
        UserTask::DeleteContact,
        UserTask::FetchUsers,
        UserTask::FetchMessages,
        UserTask::DeleteConversation,
        UserTask::CreateGroup,
        UserTask::FetchGroups,
        UserTask::AddGroupMember,
        UserTask::FetchGroupMembers,
        UserTask::FetchGroupMessages,
        UserTask::SendGroupMessage,
        UserTask::FetchGroupInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UserTask::LoginExisting => "login_existing",
            UserTask::RegisterNew => "register_new",
            UserTask::AddContact => "add_contact",
            UserTask::FetchContacts => "fetch_contacts",
            UserTask::DeleteContact => "delete_contact",
            UserTask::FetchUsers => "fetch_users",
            UserTask::FetchMessages => "fetch_messages",
            UserTask::DeleteConversation => "delete_conversation",
            UserTask::CreateGroup => "create_group",
            UserTask::FetchGroups => "fetch_groups",
            UserTask::AddGroupMember => "add_group_member",
            UserTask::FetchGroupMembers => "fetch_group_members",
            UserTask::FetchGroupMessages => "fetch_group_messages",
            UserTask::SendGroupMessage => "send_group_message",
            UserTask::FetchGroupInfo => "fetch_group_info",
        }
    }

    /// Whether the task is a no-op for users without a session identifier
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            UserTask::AddContact
                | UserTask::FetchContacts
                | UserTask::DeleteContact
                | UserTask::DeleteConversation
                | UserTask::CreateGroup
                | UserTask::FetchGroups
                | UserTask::AddGroupMember
                | UserTask::SendGroupMessage
        )
    }

    /// Selection weight. Every task is equally likely.
    pub fn weight(&self) -> u32 {
        1
    }
}

impl fmt::Display for UserTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UserTask {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        UserTask::ALL
            .iter()
            .copied()
            .find(|task| task.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownTask(s.to_string()))
    }
}

/// Weighted set of tasks a simulated user picks from each step
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<UserTask>,
    index: WeightedIndex<u32>,
}

impl TaskSet {
    /// Every task, equally weighted
    pub fn uniform() -> Self {
        Self::only(&UserTask::ALL).expect("task table is not empty")
    }

    /// Restrict selection to `tasks`, each with its own weight
    pub fn only(tasks: &[UserTask]) -> Result<Self, ConfigError> {
        let mut unique = Vec::with_capacity(tasks.len());
        for task in tasks {
            if !unique.contains(task) {
                unique.push(*task);
            }
        }

        let index = WeightedIndex::new(unique.iter().map(UserTask::weight))
            .map_err(|_| ConfigError::NoTasks)?;
        Ok(Self {
            tasks: unique,
            index,
        })
    }

    pub fn tasks(&self) -> &[UserTask] {
        &self.tasks
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> UserTask {
        self.tasks[self.index.sample(rng)]
    }
}

impl Default for TaskSet {
    fn default() -> Self {
        Self::uniform()
    }
}
