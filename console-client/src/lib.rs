//! Admin console client: the entity synchronization layer.
//!
//! Controllers own one collection each and change it only after the remote
//! gateway confirms. Every failure is converted into a notification at the
//! controller boundary.

pub mod collection;
pub mod config;
pub mod console;
pub mod controller;
pub mod dialog;
pub mod error;
pub mod gateway;
pub mod membership;
pub mod notifications;
pub mod session;
pub mod telemetry;

pub use collection::Collection;
pub use console::{Console, ConsoleGateway, LoadSummary};
pub use controller::{EntityController, LoadStatus, Operation};
pub use dialog::{DialogError, MembershipDialog};
pub use gateway::{
    AuthGateway, AuthResponse, LoginCredentials, MembershipGateway, ResourceGateway, RestGateway,
};
pub use membership::{Candidates, MemberDirectory, MembershipManager, StaticDirectory};
pub use notifications::{Notification, NotificationAction, NotificationLevel, Notifier};
pub use session::{Session, SessionState};
