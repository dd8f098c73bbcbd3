//! # patina-router
//!
//! HTTP request-path routing over per-method segment tries.
//!
//! Patterns mix literal segments, `*`/`?` globs, single-segment (`*`) and
//! greedy (`**`) wildcards, and named captures (`{name}`, `{name:regex}`).
//! Each pattern gets a fixed-width specificity key at registration, and
//! lookups walk a compressed trie with explicit-stack backtracking so the
//! most specific feasible pattern always wins.
//!
//! ## Quick Start
//!
//! ```
//! use patina_router::{Method, Router};
//!
//! # fn main() -> patina_router::Result<()> {
//! let mut router = Router::new();
//! router.get("/users", "list_users")?;
//! router.get("/users/{id:[0-9]+}", "user_detail")?;
//! router.get("/static/**", "serve_static")?;
//!
//! let m = router.find(Method::Get, "/users/42").unwrap();
//! assert_eq!(*m.handler(), "user_detail");
//! assert_eq!(m.param("id"), Some("42"));
//!
//! assert!(router.find(Method::Get, "/users/abc").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Specificity
//!
//! When several patterns could match a path, the one with the lower
//! priority key wins: literals beat constrained captures, which beat plain
//! captures, globs, single wildcards and finally greedy wildcards. A greedy
//! `**` consumes as few segments as a feasible continuation allows:
//!
//! ```
//! use patina_router::{Method, Router};
//!
//! # fn main() -> patina_router::Result<()> {
//! let mut router = Router::new();
//! router.get("/a/**", 0)?;
//! router.get("/a/**/e", 1)?;
//! router.get("/a/**/d/**/e", 2)?;
//!
//! let m = router.find(Method::Get, "/a/b/c/d/e/e").unwrap();
//! assert_eq!(*m.handler(), 2);
//! # Ok(())
//! # }
//! ```

mod error;
mod glob;
mod method;
mod pattern;
mod priority;
mod router;
mod scan;
mod segment;
mod trie;

pub use error::{Result, RouterError};
pub use method::Method;
pub use pattern::Pattern;
pub use router::{RouteInfo, RouteMatch, Router};
pub use segment::{Segment, SegmentKind};
