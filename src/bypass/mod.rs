//! Auth bypass decisions
//!
//! Decides, per request, whether Envoy's external authorization should be
//! skipped. Rules are scoped per host:
//!
//! ```json
//! {
//!   "hostSettings": {
//!     "api.example.com": {
//!       "allowOptionsRequests": true,
//!       "ignorePaths": ["/health", "/public/*"],
//!       "ignoreGraphqlOperations": ["login", "signup"]
//!     }
//!   }
//! }
//! ```
//!
//! Precedence: unknown host (never) → `OPTIONS` → ignore paths → GraphQL
//! operation name. Every ambiguous input resolves to "do not bypass".

pub mod engine;
pub mod operation;
pub mod patterns;
pub mod request;
pub mod rules;
pub mod shared;

pub use engine::{BypassDecision, BypassEngine, BypassReason, EnforceReason};
pub use operation::extract_operation_name;
pub use patterns::{PathPattern, PathPatternSet};
pub use request::{HttpAttributes, RequestDescriptor};
pub use rules::{BypassConfig, HostRuleSet};
pub use shared::SharedBypassEngine;
