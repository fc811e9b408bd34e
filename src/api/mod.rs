//! HTTP API Handlers and Routes
//!
//! All responses, success or failure, use the `{code, status, msg, data}`
//! envelope. Authentication failures answer 401 with a code naming the
//! failure kind.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Public
//! - `GET /` - Service banner
//! - `GET /health` - Health check
//! - `POST /api/user/login` - Login and receive a bearer token
//! - `POST /api/user/logout` - Client-side logout acknowledgement
//! - `GET /api/list/policy` - Paginated policy list
//! - `GET /api/list/{quality-inspection,the-service,rules-preset}` - Static lookup lists
//!
//! ## User (`/api/user`, `/api/message`, `/api/chat`)
//! - `POST /api/user/info` - Current user's profile
//! - `POST /api/user/menu` - Menu filtered by role
//! - `POST /api/message/list` - Notifications
//! - `POST /api/message/read` - Mark notifications as read
//! - `POST /api/chat/list` - Chat contacts
//! - `POST /api/user/{my-project/list,my-team/list,latest-activity}` - User-center panels
//! - `POST /api/user/save-info` - Save the caller's basic settings
//! - `POST /api/user/certification` - Enterprise certification
//! - `GET /api/profile/basic` - Stream settings
//! - `GET /api/operation/log` - Operation log
//!
//! ## Materials (`/api/material`)
//! - `POST /api/material/upload` - Submit a material for review
//! - `POST /api/material/list` - List materials, optionally filtered
//! - `POST /api/material/pending` - Materials awaiting review
//! - `POST /api/material/review` - Approve or reject (reviewer, admin)
//! - `POST /api/material/batch-review` - Review several at once (reviewer, admin)
//! - `POST /api/material/statistics` - Counts by status and category
//! - `POST /api/material/delete` - Delete (uploader, admin)
//! - `POST /api/material/ai-review` - Score a material and attach the result
//!
//! # Authentication
//!
//! Every endpoint outside the public list requires:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Extractors that reject with the response envelope.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
