// Request payloads for the chat API

use serde::{Deserialize, Serialize};

/// Password shared by every generated account
pub const DEFAULT_PASSWORD: &str = "test123";

/// Group targeted by all group tasks
pub const FIXED_GROUP_ID: u64 = 1;

pub const GROUP_MESSAGE_TEXT: &str = "Hello from the load test!";

pub const GROUP_MESSAGE_TIMESTAMP: &str = "2025-09-01 12:00:00";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddContactRequest {
    pub owner: u64,
    pub contact: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteContactRequest {
    pub owner: u64,
    pub contact: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConversationRequest {
    pub user1: u64,
    pub user2: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub admin: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddGroupMemberRequest {
    #[serde(rename = "groupId")]
    pub group_id: u64,
    pub member: u64,
}

/// Message posted to a group. `attachment_url` is always serialized,
/// as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMessageRequest {
    #[serde(rename = "groupId")]
    pub group_id: u64,
    pub from: u64,
    pub text: String,
    pub attachment_url: Option<String>,
    pub timestamp: String,
}
