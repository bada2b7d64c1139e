//! Database models
//!
//! Serde models matching the document store, one file per entity, with
//! create/update payloads alongside.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod event;
pub mod order;
pub mod organizer;
pub mod serde_helpers;
pub mod ticket;
pub mod user;

pub use account::{MasterAccount, Role};
pub use admin::AdminProfile;
pub use catalog::{Artist, CatalogCreate, Genre, Location};
pub use event::{
    Event, EventCreate, EventStatus, EventTransitionError, EventUpdate, TicketCategory,
    TicketCategoryCreate, TicketType, TicketTypeCreate,
};
pub use order::{
    AttendeeInfo, Order, OrderCreate, OrderItem, OrderItemInput, PaymentStatus,
};
pub use organizer::{
    OrganizerProfile, OrganizerStatus, OrganizerTransitionError, OrganizerUpdate,
};
pub use ticket::Ticket;
pub use user::{UserProfile, UserUpdate};
