//! Simulated chat user
//!
//! A [`ChatUser`] registers and logs in once when it starts, then performs
//! one randomly chosen [`UserTask`] per step. Tasks never fail: transport
//! errors and error statuses are tracked by the transport and otherwise
//! ignored, so a user always moves on to its next task.

pub mod identity;
pub mod tasks;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::api::{
    AddContactRequest, AddGroupMemberRequest, CreateGroupRequest, DeleteContactRequest,
    DeleteConversationRequest, GroupMessageRequest, Route, FIXED_GROUP_ID, GROUP_MESSAGE_TEXT,
    GROUP_MESSAGE_TIMESTAMP,
};
use crate::error::TransportResult;
use crate::transport::{encode_body, ApiResponse, SharedTransport};

pub use identity::{Credentials, CONTACT_PREFIX, NEW_USER_PREFIX, USER_PREFIX};
pub use tasks::{TaskSet, UserTask};

const USER_NAME: &str = "Load Test";
const NEW_USER_NAME: &str = "Another Test";
const CONTACT_NAME: &str = "Contact User";

/// One simulated user of the chat application
pub struct ChatUser {
    transport: SharedTransport,
    credentials: Credentials,
    // Assigned once in `start_with_rng`, never mutated afterwards
    session_id: Option<u64>,
    rng: StdRng,
}

impl ChatUser {
    /// Register and log in a new account
    pub async fn start(transport: SharedTransport) -> Self {
        Self::start_with_rng(transport, StdRng::from_entropy()).await
    }

    /// Startup routine with a caller-provided random source
    pub async fn start_with_rng(transport: SharedTransport, mut rng: StdRng) -> Self {
        let credentials = Credentials::generate(USER_PREFIX, &mut rng);

        let mut user = Self {
            transport,
            credentials,
            session_id: None,
            rng,
        };

        // Registration outcome only matters through the login that follows
        let register = user.credentials.register_request(USER_NAME);
        user.post(Route::Register, &register).await;

        let login = user.credentials.login_request();
        user.session_id = user
            .post(Route::Login, &login)
            .await
            .and_then(account_id);

        match user.session_id {
            Some(id) => tracing::debug!("{} logged in as user {}", user.credentials.identifier, id),
            None => tracing::debug!(
                "{} has no session, session tasks are disabled",
                user.credentials.identifier
            ),
        }

        user
    }

    pub fn session_id(&self) -> Option<u64> {
        self.session_id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Pick one task from `tasks` and run it
    pub async fn step(&mut self, tasks: &TaskSet) -> UserTask {
        let task = tasks.pick(&mut self.rng);
        self.run_task(task).await;
        task
    }

    /// Run exactly one task
    pub async fn run_task(&mut self, task: UserTask) {
        tracing::trace!("{} running {}", self.credentials.identifier, task);
        match task {
            UserTask::LoginExisting => self.login_existing().await,
            UserTask::RegisterNew => self.register_new().await,
            UserTask::AddContact => self.add_contact().await,
            UserTask::FetchContacts => self.fetch_contacts().await,
            UserTask::DeleteContact => self.delete_contact().await,
            UserTask::FetchUsers => self.get(Route::Users).await,
            UserTask::FetchMessages => self.get(Route::Messages).await,
            UserTask::DeleteConversation => self.delete_conversation().await,
            UserTask::CreateGroup => self.create_group().await,
            UserTask::FetchGroups => self.fetch_groups().await,
            UserTask::AddGroupMember => self.add_group_member().await,
            UserTask::FetchGroupMembers => self.get(Route::GroupMembers(FIXED_GROUP_ID)).await,
            UserTask::FetchGroupMessages => self.get(Route::GroupMessages(FIXED_GROUP_ID)).await,
            UserTask::SendGroupMessage => self.send_group_message().await,
            UserTask::FetchGroupInfo => self.get(Route::GroupInfo(FIXED_GROUP_ID)).await,
        }
    }

    // ---------------- AUTH ----------------

    async fn login_existing(&mut self) {
        let login = self.credentials.login_request();
        self.post(Route::Login, &login).await;
    }

    async fn register_new(&mut self) {
        let account = Credentials::generate(NEW_USER_PREFIX, &mut self.rng);
        self.post(Route::Register, &account.register_request(NEW_USER_NAME))
            .await;
    }

    // ---------------- CONTACTS ----------------

    async fn add_contact(&mut self) {
        let Some(owner) = self.session_id else {
            return;
        };

        let account = Credentials::generate(CONTACT_PREFIX, &mut self.rng);
        let contact = self
            .post(Route::Register, &account.register_request(CONTACT_NAME))
            .await
            .and_then(account_id);

        if let Some(contact) = contact {
            let request = AddContactRequest {
                owner,
                contact,
                name: format!("Friend-{}", self.rng.gen_range(1..=100)),
            };
            self.post(Route::AddContact, &request).await;
        }
    }

    async fn fetch_contacts(&mut self) {
        if let Some(user_id) = self.session_id {
            self.get(Route::Contacts(user_id)).await;
        }
    }

    async fn delete_contact(&mut self) {
        if let Some(user_id) = self.session_id {
            // The neighbouring id is unlikely to be a contact
            let request = DeleteContactRequest {
                owner: user_id,
                contact: user_id.saturating_add(1),
            };
            self.post(Route::DeleteContact, &request).await;
        }
    }

    // ---------------- MESSAGES ----------------

    async fn delete_conversation(&mut self) {
        if let Some(user_id) = self.session_id {
            let request = DeleteConversationRequest {
                user1: user_id,
                user2: user_id.saturating_add(1),
            };
            self.post(Route::DeleteConversation, &request).await;
        }
    }

    // ---------------- GROUPS ----------------

    async fn create_group(&mut self) {
        if let Some(admin) = self.session_id {
            let request = CreateGroupRequest {
                name: format!("Group-{}", self.rng.gen_range(1..=100)),
                admin,
            };
            self.post(Route::CreateGroup, &request).await;
        }
    }

    async fn fetch_groups(&mut self) {
        if let Some(user_id) = self.session_id {
            self.get(Route::Groups(user_id)).await;
        }
    }

    async fn add_group_member(&mut self) {
        if let Some(member) = self.session_id {
            let request = AddGroupMemberRequest {
                group_id: FIXED_GROUP_ID,
                member,
            };
            self.post(Route::AddGroupMember, &request).await;
        }
    }

    async fn send_group_message(&mut self) {
        if let Some(from) = self.session_id {
            let request = GroupMessageRequest {
                group_id: FIXED_GROUP_ID,
                from,
                text: GROUP_MESSAGE_TEXT.to_string(),
                attachment_url: None,
                timestamp: GROUP_MESSAGE_TIMESTAMP.to_string(),
            };
            self.post(Route::SendGroupMessage, &request).await;
        }
    }

    // ---------------- REQUESTS ----------------

    async fn get(&self, route: Route) {
        let _ = self.send(route, None).await;
    }

    async fn post<T: Serialize>(&self, route: Route, payload: &T) -> Option<ApiResponse> {
        let body = match encode_body(payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("{} for {}", e, route);
                return None;
            }
        };
        self.send(route, Some(body)).await
    }

    async fn send(&self, route: Route, body: Option<serde_json::Value>) -> Option<ApiResponse> {
        let result: TransportResult<ApiResponse> = self.transport.send(route, body).await;
        match result {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::debug!("{}", e);
                None
            }
        }
    }
}

/// Account id carried by a register or login response. Zero is not a valid id.
fn account_id(response: ApiResponse) -> Option<u64> {
    response.id().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::RecordingTransport;
    use crate::transport::ApiResponse;
    use serde_json::json;
    use std::sync::Arc;

    async fn start_user(transport: &RecordingTransport) -> ChatUser {
        ChatUser::start_with_rng(Arc::new(transport.clone()), StdRng::seed_from_u64(11)).await
    }

    #[tokio::test]
    async fn test_startup_registers_then_logs_in() {
        let transport = RecordingTransport::with_ids(42, 100);
        let user = start_user(&transport).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].route, Route::Register);
        assert_eq!(requests[1].route, Route::Login);

        let register = requests[0].body.as_ref().unwrap();
        assert_eq!(register["name"], "Load Test");
        assert_eq!(register["identifier"], user.credentials().identifier.as_str());
        assert_eq!(register["password"], "test123");
        assert_eq!(
            requests[1].body.as_ref().unwrap(),
            &json!({ "identifier": user.credentials().identifier, "password": "test123" })
        );

        assert_eq!(user.session_id(), Some(42));
    }

    #[tokio::test]
    async fn test_session_unset_without_id() {
        let transport = RecordingTransport::with_responder(|_, _| {
            Ok(ApiResponse::json(200, &json!({ "message": "Login successful" })))
        });
        let user = start_user(&transport).await;
        assert_eq!(user.session_id(), None);
    }

    #[tokio::test]
    async fn test_session_unset_on_error_status() {
        let transport = RecordingTransport::with_responder(|route, _| match route {
            Route::Login => Ok(ApiResponse::json(429, &json!({ "id": 5 }))),
            _ => Ok(ApiResponse::json(200, &json!({}))),
        });
        let user = start_user(&transport).await;
        assert_eq!(user.session_id(), None);
    }

    #[tokio::test]
    async fn test_session_tasks_are_noops_without_session() {
        let transport = RecordingTransport::unreachable();
        let mut user = start_user(&transport).await;
        assert_eq!(user.session_id(), None);
        transport.clear();

        for task in UserTask::ALL.iter().filter(|task| task.requires_session()) {
            user.run_task(*task).await;
        }
        assert_eq!(transport.request_count(), 0);

        user.run_task(UserTask::CreateGroup).await;
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_sessionless_tasks_still_run_without_session() {
        let transport = RecordingTransport::unreachable();
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::FetchUsers).await;
        user.run_task(UserTask::FetchGroupInfo).await;
        user.run_task(UserTask::LoginExisting).await;

        let routes: Vec<Route> = transport.requests().iter().map(|r| r.route).collect();
        assert_eq!(
            routes,
            vec![Route::Users, Route::GroupInfo(1), Route::Login]
        );
    }

    #[tokio::test]
    async fn test_fetch_and_delete_contact_with_session() {
        let transport = RecordingTransport::with_ids(42, 100);
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::FetchContacts).await;
        user.run_task(UserTask::DeleteContact).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].route, Route::Contacts(42));
        assert_eq!(requests[0].route.path(), "/contacts/42");
        assert_eq!(requests[0].route.method(), Method::Get);
        assert_eq!(requests[1].route, Route::DeleteContact);
        assert_eq!(
            requests[1].body.as_ref().unwrap(),
            &json!({ "owner": 42, "contact": 43 })
        );
    }

    #[tokio::test]
    async fn test_delete_conversation_targets_neighbour() {
        let transport = RecordingTransport::with_ids(42, 100);
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::DeleteConversation).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].route, Route::DeleteConversation);
        assert_eq!(requests[0].route.method(), Method::Post);
        assert_eq!(
            requests[0].body.as_ref().unwrap(),
            &json!({ "user1": 42, "user2": 43 })
        );
    }

    #[tokio::test]
    async fn test_register_new_uses_fresh_account() {
        let transport = RecordingTransport::with_ids(42, 100);
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::RegisterNew).await;
        user.run_task(UserTask::RegisterNew).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let mut identifiers = Vec::new();
        for request in &requests {
            assert_eq!(request.route, Route::Register);
            let body = request.body.as_ref().unwrap();
            assert_eq!(body["name"], "Another Test");
            assert_eq!(body["password"], "test123");

            let identifier = body["identifier"].as_str().unwrap();
            assert!(identifier.starts_with(NEW_USER_PREFIX));
            assert!(identifier.ends_with("@test.com"));
            assert_ne!(identifier, user.credentials().identifier);
            identifiers.push(identifier.to_string());
        }
        assert_ne!(identifiers[0], identifiers[1]);
        assert_eq!(user.session_id(), Some(42));
    }

    #[tokio::test]
    async fn test_fetch_messages() {
        let transport = RecordingTransport::unreachable();
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::FetchMessages).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].route, Route::Messages);
        assert_eq!(requests[0].route.method(), Method::Get);
        assert_eq!(requests[0].route.path(), "/messages");
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn test_zero_id_leaves_session_unset() {
        let transport = RecordingTransport::with_ids(0, 100);
        let mut user = start_user(&transport).await;
        assert_eq!(user.session_id(), None);
        transport.clear();

        user.run_task(UserTask::FetchContacts).await;
        user.run_task(UserTask::CreateGroup).await;
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_add_contact_skipped_when_contact_id_is_zero() {
        let transport = RecordingTransport::with_ids(42, 0);
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::AddContact).await;

        assert_eq!(transport.count_matching(|r| *r == Route::Register), 1);
        assert_eq!(transport.count_matching(|r| *r == Route::AddContact), 0);
    }

    #[tokio::test]
    async fn test_add_contact_follows_successful_registration() {
        let transport = RecordingTransport::with_ids(42, 100);
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::AddContact).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].route, Route::Register);
        let register = requests[0].body.as_ref().unwrap();
        assert_eq!(register["name"], "Contact User");
        assert!(register["identifier"]
            .as_str()
            .unwrap()
            .starts_with(CONTACT_PREFIX));

        assert_eq!(requests[1].route, Route::AddContact);
        let add = requests[1].body.as_ref().unwrap();
        assert_eq!(add["owner"], 42);
        assert_eq!(add["contact"], 100);
        let name = add["name"].as_str().unwrap();
        let suffix: u32 = name.strip_prefix("Friend-").unwrap().parse().unwrap();
        assert!((1..=100).contains(&suffix));
    }

    #[tokio::test]
    async fn test_add_contact_skipped_when_registration_has_no_id() {
        let transport = RecordingTransport::with_responder(|route, _| match route {
            Route::Login => Ok(ApiResponse::json(200, &json!({ "id": 42 }))),
            Route::Register => Ok(ApiResponse::json(
                400,
                &json!({ "error": "User already exists" }),
            )),
            _ => Ok(ApiResponse::json(200, &json!({}))),
        });
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::AddContact).await;

        assert_eq!(transport.count_matching(|r| *r == Route::Register), 1);
        assert_eq!(transport.count_matching(|r| *r == Route::AddContact), 0);
    }

    #[tokio::test]
    async fn test_group_tasks_use_fixed_group() {
        let transport = RecordingTransport::with_ids(7, 100);
        let mut user = start_user(&transport).await;
        transport.clear();

        user.run_task(UserTask::CreateGroup).await;
        user.run_task(UserTask::FetchGroups).await;
        user.run_task(UserTask::AddGroupMember).await;
        user.run_task(UserTask::SendGroupMessage).await;
        user.run_task(UserTask::FetchGroupMembers).await;
        user.run_task(UserTask::FetchGroupMessages).await;

        let requests = transport.requests();
        assert_eq!(requests[0].route, Route::CreateGroup);
        assert_eq!(requests[0].body.as_ref().unwrap()["admin"], 7);
        assert_eq!(requests[1].route, Route::Groups(7));
        assert_eq!(
            requests[2].body.as_ref().unwrap(),
            &json!({ "groupId": 1, "member": 7 })
        );
        assert_eq!(
            requests[3].body.as_ref().unwrap(),
            &json!({
                "groupId": 1,
                "from": 7,
                "text": "Hello from the load test!",
                "attachment_url": null,
                "timestamp": "2025-09-01 12:00:00"
            })
        );
        assert_eq!(requests[4].route, Route::GroupMembers(1));
        assert_eq!(requests[5].route, Route::GroupMessages(1));
    }

    #[tokio::test]
    async fn test_session_stable_across_tasks() {
        let logins = Arc::new(parking_lot::Mutex::new(0u64));
        let transport = RecordingTransport::with_responder(move |route, _| match route {
            Route::Login => {
                // Every later login reports a different id
                let mut count = logins.lock();
                *count += 1;
                Ok(ApiResponse::json(200, &json!({ "id": 10 + *count })))
            }
            _ => Ok(ApiResponse::json(200, &json!({ "id": 500 }))),
        });
        let mut user = start_user(&transport).await;
        assert_eq!(user.session_id(), Some(11));

        let tasks = TaskSet::uniform();
        for _ in 0..200 {
            user.step(&tasks).await;
            assert_eq!(user.session_id(), Some(11));
        }
        assert!(transport.count_matching(|r| *r == Route::Login) > 1);
    }
}
