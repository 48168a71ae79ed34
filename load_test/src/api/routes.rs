//! Route table for the chat API

use std::fmt;

/// HTTP method used by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One endpoint of the chat API, with its path parameters filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Register,
    Login,
    AddContact,
    Contacts(u64),
    DeleteContact,
    Users,
    Messages,
    DeleteConversation,
    CreateGroup,
    Groups(u64),
    AddGroupMember,
    GroupMembers(u64),
    GroupMessages(u64),
    SendGroupMessage,
    GroupInfo(u64),
}

impl Route {
    pub fn method(&self) -> Method {
        match self {
            Route::Contacts(_)
            | Route::Users
            | Route::Messages
            | Route::Groups(_)
            | Route::GroupMembers(_)
            | Route::GroupMessages(_)
            | Route::GroupInfo(_) => Method::Get,
            Route::Register
            | Route::Login
            | Route::AddContact
            | Route::DeleteContact
            | Route::DeleteConversation
            | Route::CreateGroup
            | Route::AddGroupMember
            | Route::SendGroupMessage => Method::Post,
        }
    }

    /// Request path relative to the target host
    pub fn path(&self) -> String {
        match self {
            Route::Register => "/api/auth/register".to_string(),
            Route::Login => "/api/auth/login".to_string(),
            Route::AddContact => "/add-contact".to_string(),
            Route::Contacts(user_id) => format!("/contacts/{}", user_id),
            Route::DeleteContact => "/delete-contact".to_string(),
            Route::Users => "/users".to_string(),
            Route::Messages => "/messages".to_string(),
            Route::DeleteConversation => "/delete-conversation".to_string(),
            Route::CreateGroup => "/create-group".to_string(),
            Route::Groups(user_id) => format!("/groups/{}", user_id),
            Route::AddGroupMember => "/add-group-member".to_string(),
            Route::GroupMembers(group_id) => format!("/group-members/{}", group_id),
            Route::GroupMessages(group_id) => format!("/group-messages/{}", group_id),
            Route::SendGroupMessage => "/group-messages".to_string(),
            Route::GroupInfo(group_id) => format!("/group-info/{}", group_id),
        }
    }

    /// Aggregation key for request statistics.
    ///
    /// Parameterized paths collapse into one entry per endpoint, so
    /// `/contacts/42` and `/contacts/43` are both reported as
    /// `/contacts/[userId]`.
    pub fn stats_name(&self) -> &'static str {
        match self {
            Route::Register => "/api/auth/register",
            Route::Login => "/api/auth/login",
            Route::AddContact => "/add-contact",
            Route::Contacts(_) => "/contacts/[userId]",
            Route::DeleteContact => "/delete-contact",
            Route::Users => "/users",
            Route::Messages => "/messages",
            Route::DeleteConversation => "/delete-conversation",
            Route::CreateGroup => "/create-group",
            Route::Groups(_) => "/groups/[userId]",
            Route::AddGroupMember => "/add-group-member",
            Route::GroupMembers(_) => "/group-members/[groupId]",
            Route::GroupMessages(_) => "/group-messages/[groupId]",
            Route::SendGroupMessage => "/group-messages",
            Route::GroupInfo(_) => "/group-info/[groupId]",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterized_paths() {
        assert_eq!(Route::Contacts(42).path(), "/contacts/42");
        assert_eq!(Route::Groups(7).path(), "/groups/7");
        assert_eq!(Route::GroupInfo(1).path(), "/group-info/1");
        assert_eq!(Route::GroupMessages(1).path(), "/group-messages/1");
    }

    #[test]
    fn test_stats_name_groups_parameters() {
        assert_eq!(
            Route::Contacts(1).stats_name(),
            Route::Contacts(2).stats_name()
        );
        assert_ne!(
            Route::GroupMessages(1).stats_name(),
            Route::SendGroupMessage.stats_name()
        );
    }

    #[test]
    fn test_methods() {
        assert_eq!(Route::GroupMessages(1).method(), Method::Get);
        assert_eq!(Route::SendGroupMessage.method(), Method::Post);
        assert_eq!(Route::Login.to_string(), "POST /api/auth/login");
    }
}
