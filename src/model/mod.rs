/* src/model/mod.rs */

//!
//! Host-side collaborators of the hotswap engine.
//!
//! - [`ClassRegistry`] - class identities and their supertypes
//! - [`RouteRegistry`] - route and layout registrations
//! - [`Ui`] / [`ComponentTree`] - live component tree and router chain
//! - [`Session`] - lock-guarded set of UIs
//! - [`Service`] - configuration, listeners and the live-reload channel

mod class;
mod routes;
mod service;
mod session;
mod tree;
mod ui;

pub use class::{ClassId, ClassRegistry};
pub use routes::{ResolvedRoute, RouteRegistry, RouteTarget};
pub use service::{LifecycleListener, LiveReload, Service, ServiceBuilder};
pub use session::{Session, SessionData, SessionId};
pub use tree::{ComponentTree, Descendants, NodeId};
pub use ui::{ClientChannel, ClientCommand, PushMode, Ui, UiId};
